//! Summary statistics over simulated outcomes.
//!
//! All percentiles use linear interpolation between order statistics: for
//! sorted values `x[0..n]` and level `p` in percent, the rank is
//! `h = (n - 1)·p / 100` and the result is
//! `x[⌊h⌋] + (h - ⌊h⌋)·(x[⌊h⌋ + 1] - x[⌊h⌋])`. This matches the default
//! (`linear`) method of NumPy's `percentile`.

/// Percentile levels reported per day by [`PercentileBand`].
pub const BAND_LEVELS: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Linear-interpolation percentile over already sorted values.
///
/// `level` is in percent and clamped to `[0, 100]`. Returns `NaN` for an
/// empty slice.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::percentile_sorted;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(percentile_sorted(&sorted, 50.0), 2.5);
/// assert_eq!(percentile_sorted(&sorted, 0.0), 1.0);
/// assert_eq!(percentile_sorted(&sorted, 100.0), 4.0);
/// ```
pub fn percentile_sorted(sorted: &[f64], level: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (n - 1) as f64 * level.clamp(0.0, 100.0) / 100.0;
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            let fraction = rank - lower as f64;
            sorted[lower] + fraction * (sorted[upper] - sorted[lower])
        }
    }
}

/// Sorts a copy of `values` in ascending order.
///
/// NaN values sort last.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Terminal-value summary of an ensemble.
///
/// `std_dev` is the population standard deviation (divisor `n`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SummaryStatistics {
    /// Initial investment value the outcomes are measured against.
    pub initial_value: f64,
    /// Number of terminal values summarised.
    pub num_paths: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// 50th percentile.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// 5th percentile.
    pub percentile_5: f64,
    /// 95th percentile.
    pub percentile_95: f64,
    /// Smallest terminal value.
    pub min: f64,
    /// Largest terminal value.
    pub max: f64,
    /// Fraction of terminal values strictly above `initial_value`.
    pub probability_of_profit: f64,
    /// Mean terminal return in percent of `initial_value`.
    pub mean_return_pct: f64,
}

impl SummaryStatistics {
    /// Computes the summary of `terminal` values against `initial_value`.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_terminal_values(terminal: &[f64], initial_value: f64) -> Option<Self> {
        if terminal.is_empty() {
            return None;
        }

        let n = terminal.len() as f64;
        let mean = terminal.iter().sum::<f64>() / n;
        let variance = terminal.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let sorted = sorted_copy(terminal);
        let profitable = terminal.iter().filter(|&&v| v > initial_value).count();

        Some(Self {
            initial_value,
            num_paths: terminal.len(),
            mean,
            median: percentile_sorted(&sorted, 50.0),
            std_dev: variance.sqrt(),
            percentile_5: percentile_sorted(&sorted, 5.0),
            percentile_95: percentile_sorted(&sorted, 95.0),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            probability_of_profit: profitable as f64 / n,
            mean_return_pct: (mean - initial_value) / initial_value * 100.0,
        })
    }
}

/// Percentiles across all paths at one day.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PercentileBand {
    /// Day index (0 is the initial value).
    pub day: usize,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 50th percentile.
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl PercentileBand {
    /// Computes the band for one day's cross-section of path values.
    pub fn from_values(day: usize, values: &[f64]) -> Self {
        let sorted = sorted_copy(values);
        let [p5, p25, p50, p75, p95] = BAND_LEVELS.map(|level| percentile_sorted(&sorted, level));
        Self {
            day,
            p5,
            p25,
            p50,
            p75,
            p95,
        }
    }
}

/// Equal-width histogram.
///
/// The last bin is closed on the right so the maximum is counted.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Count per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width buckets spanning their range.
    ///
    /// Non-finite values are skipped. Returns `None` when `bins` is 0 or no
    /// finite value remains. When all values are equal the single value
    /// range is widened by ±0.5 so every value lands in a bin.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let finite = || values.iter().copied().filter(|v| v.is_finite());
        let lo = finite().fold(f64::INFINITY, f64::min);
        let hi = finite().fold(f64::NEG_INFINITY, f64::max);
        if lo > hi {
            return None;
        }
        let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0; bins];
        for v in finite() {
            let index = (((v - lo) / width) as usize).min(bins - 1);
            counts[index] += 1;
        }

        Some(Self { edges, counts })
    }

    /// Total number of binned values.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
