//! Single-path generation for geometric Brownian motion.
//!
//! Paths are generated with the log-space Euler discretisation, which keeps
//! every value strictly positive:
//!
//! ```text
//! S[0]   = S0
//! S[t]   = S[t-1] × exp((μ - ½σ²)·dt + σ·√dt·Z_t),   t = 1..=h
//! ```
//!
//! with `dt = 1 / trading_days_per_year` and `Z_t` standard normal. Given the
//! same shock sequence a path is fully deterministic.

use super::error::SimulationError;
use crate::rng::NormalSource;

/// Model parameters for one simulated path.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::GbmParams;
///
/// let params = GbmParams::new(10_000.0, 0.1245, 0.1876, 252);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Value at day 0.
    pub initial_value: f64,
    /// Annualised expected return (μ).
    pub annual_drift: f64,
    /// Annualised volatility (σ).
    pub annual_volatility: f64,
    /// Number of simulated trading days.
    pub horizon_days: usize,
    /// Trading days per year; `dt = 1 / trading_days_per_year`.
    pub trading_days_per_year: f64,
}

impl GbmParams {
    /// Creates parameters with the default 252 trading days per year.
    #[inline]
    pub fn new(
        initial_value: f64,
        annual_drift: f64,
        annual_volatility: f64,
        horizon_days: usize,
    ) -> Self {
        Self {
            initial_value,
            annual_drift,
            annual_volatility,
            horizon_days,
            trading_days_per_year: super::config::TRADING_DAYS_PER_YEAR,
        }
    }

    /// Time step in years.
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / self.trading_days_per_year
    }

    /// Deterministic log-increment per day, `(μ - ½σ²)·dt`.
    #[inline]
    pub fn drift_term(&self) -> f64 {
        (self.annual_drift - 0.5 * self.annual_volatility * self.annual_volatility) * self.dt()
    }

    /// Shock scale per day, `σ·√dt`.
    #[inline]
    pub fn diffusion_coefficient(&self) -> f64 {
        self.annual_volatility * self.dt().sqrt()
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if:
    /// - `initial_value` is not positive and finite
    /// - `horizon_days` is 0 or `horizon_days + 1` overflows `usize`
    /// - `annual_volatility` is negative or not finite
    /// - `annual_drift` is not finite
    /// - `trading_days_per_year` is not positive and finite
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.initial_value > 0.0 && self.initial_value.is_finite()) {
            return Err(SimulationError::invalid(
                "initial_value",
                format!("must be positive and finite, got {}", self.initial_value),
            ));
        }
        if self.horizon_days == 0 {
            return Err(SimulationError::invalid(
                "horizon_days",
                "must be at least 1, got 0",
            ));
        }
        if self.horizon_days == usize::MAX {
            return Err(SimulationError::invalid(
                "horizon_days",
                format!("path length overflows usize, got {}", self.horizon_days),
            ));
        }
        if !(self.annual_volatility >= 0.0 && self.annual_volatility.is_finite()) {
            return Err(SimulationError::invalid(
                "annual_volatility",
                format!(
                    "must be non-negative and finite, got {}",
                    self.annual_volatility
                ),
            ));
        }
        if !self.annual_drift.is_finite() {
            return Err(SimulationError::invalid(
                "annual_drift",
                format!("must be finite, got {}", self.annual_drift),
            ));
        }
        if !(self.trading_days_per_year > 0.0 && self.trading_days_per_year.is_finite()) {
            return Err(SimulationError::invalid(
                "trading_days_per_year",
                format!(
                    "must be positive and finite, got {}",
                    self.trading_days_per_year
                ),
            ));
        }
        Ok(())
    }
}

/// Produces GBM paths from a stream of normal shocks.
///
/// The drift term and diffusion coefficient are computed once at
/// construction.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::{GbmParams, PathSimulator};
/// use mc_engine::rng::SimRng;
///
/// let simulator = PathSimulator::new(GbmParams::new(100.0, 0.05, 0.2, 10)).unwrap();
/// let mut rng = SimRng::from_seed(42);
///
/// let path = simulator.simulate(&mut rng);
/// assert_eq!(path.len(), 11);
/// assert_eq!(path[0], 100.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSimulator {
    initial_value: f64,
    horizon_days: usize,
    drift_term: f64,
    diffusion_coefficient: f64,
}

impl PathSimulator {
    /// Creates a simulator after validating `params`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if
    /// [`GbmParams::validate`] fails.
    pub fn new(params: GbmParams) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self {
            initial_value: params.initial_value,
            horizon_days: params.horizon_days,
            drift_term: params.drift_term(),
            diffusion_coefficient: params.diffusion_coefficient(),
        })
    }

    /// Number of values in each produced path (`horizon_days + 1`).
    #[inline]
    pub fn path_len(&self) -> usize {
        self.horizon_days + 1
    }

    /// Returns the value at day 0.
    #[inline]
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Returns the per-day log drift.
    #[inline]
    pub fn drift_term(&self) -> f64 {
        self.drift_term
    }

    /// Returns the per-day shock scale.
    #[inline]
    pub fn diffusion_coefficient(&self) -> f64 {
        self.diffusion_coefficient
    }

    /// Returns a lazy iterator over one path.
    ///
    /// Yields `horizon_days + 1` values. Day 0 consumes no draw; each later
    /// day consumes exactly one, so the stream advances only as far as the
    /// iterator is driven.
    #[inline]
    pub fn path<S: NormalSource>(&self, source: S) -> PathIter<S> {
        PathIter {
            simulator: *self,
            source,
            day: 0,
            current: self.initial_value,
        }
    }

    /// Simulates one full path into a new vector.
    ///
    /// Pulls exactly `horizon_days` draws from `source`. A
    /// [`ShockReplay`](crate::rng::ShockReplay) shorter than that pads the
    /// remaining days with zero shocks.
    pub fn simulate<S: NormalSource>(&self, source: &mut S) -> Vec<f64> {
        self.path(source).collect()
    }

    /// Simulates one full path into `row`.
    ///
    /// # Panics
    ///
    /// Panics if `row.len() != horizon_days + 1`.
    pub fn simulate_into<S: NormalSource>(&self, source: &mut S, row: &mut [f64]) {
        assert_eq!(
            row.len(),
            self.path_len(),
            "row length must equal horizon_days + 1"
        );

        let mut price = self.initial_value;
        row[0] = price;
        for slot in row[1..].iter_mut() {
            let z = source.next_normal();
            price *= (self.drift_term + self.diffusion_coefficient * z).exp();
            *slot = price;
        }
    }
}

/// Lazy single-path iterator returned by [`PathSimulator::path`].
#[derive(Debug)]
pub struct PathIter<S> {
    simulator: PathSimulator,
    source: S,
    day: usize,
    current: f64,
}

impl<S: NormalSource> Iterator for PathIter<S> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.day > self.simulator.horizon_days {
            return None;
        }
        if self.day > 0 {
            let z = self.source.next_normal();
            self.current *=
                (self.simulator.drift_term + self.simulator.diffusion_coefficient * z).exp();
        }
        self.day += 1;
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.simulator.path_len().saturating_sub(self.day);
        (remaining, Some(remaining))
    }
}

impl<S: NormalSource> ExactSizeIterator for PathIter<S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ShockReplay, SimRng};
    use approx::assert_relative_eq;

    #[test]
    fn test_gbm_params_validation() {
        assert!(GbmParams::new(100.0, 0.05, 0.2, 10).validate().is_ok());
        assert!(GbmParams::new(100.0, 0.05, 0.0, 10).validate().is_ok());

        let cases = [
            (GbmParams::new(0.0, 0.05, 0.2, 10), "initial_value"),
            (GbmParams::new(-100.0, 0.05, 0.2, 10), "initial_value"),
            (GbmParams::new(f64::INFINITY, 0.05, 0.2, 10), "initial_value"),
            (GbmParams::new(100.0, 0.05, 0.2, 0), "horizon_days"),
            (GbmParams::new(100.0, 0.05, 0.2, usize::MAX), "horizon_days"),
            (GbmParams::new(100.0, 0.05, -0.1, 10), "annual_volatility"),
            (GbmParams::new(100.0, 0.05, f64::NAN, 10), "annual_volatility"),
            (GbmParams::new(100.0, f64::NAN, 0.2, 10), "annual_drift"),
        ];
        for (params, parameter) in cases {
            let err = params.validate().unwrap_err();
            assert_eq!(err.parameter(), parameter, "{:?}", params);
        }
    }

    #[test]
    fn test_coefficients() {
        let params = GbmParams::new(10_000.0, 0.1245, 0.1876, 252);
        let dt = 1.0 / 252.0;

        assert_relative_eq!(params.dt(), dt);
        assert_relative_eq!(
            params.drift_term(),
            (0.1245 - 0.5 * 0.1876 * 0.1876) * dt,
            epsilon = 1e-15
        );
        assert_relative_eq!(
            params.diffusion_coefficient(),
            0.1876 * dt.sqrt(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_new_rejects_invalid() {
        assert!(PathSimulator::new(GbmParams::new(0.0, 0.05, 0.2, 10)).is_err());
    }

    #[test]
    fn test_path_starts_at_initial_value() {
        let simulator = PathSimulator::new(GbmParams::new(250.0, 0.05, 0.3, 30)).unwrap();
        let mut rng = SimRng::from_seed(1);

        let path = simulator.simulate(&mut rng);
        assert_eq!(path.len(), 31);
        assert_eq!(path[0], 250.0);
    }

    #[test]
    fn test_path_matches_hand_computation() {
        let params = GbmParams::new(100.0, 0.08, 0.25, 3);
        let simulator = PathSimulator::new(params).unwrap();
        let shocks = [0.3, -1.2, 2.0];

        let path = simulator.simulate(&mut ShockReplay::new(shocks));

        let mut expected = 100.0;
        assert_eq!(path[0], expected);
        for (day, z) in shocks.iter().enumerate() {
            expected *= (params.drift_term() + params.diffusion_coefficient() * z).exp();
            assert_relative_eq!(path[day + 1], expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_iterator_and_simulate_into_agree() {
        let simulator = PathSimulator::new(GbmParams::new(100.0, 0.05, 0.2, 50)).unwrap();

        let lazy: Vec<f64> = simulator.path(SimRng::from_seed(9)).collect();

        let mut row = vec![0.0; simulator.path_len()];
        simulator.simulate_into(&mut SimRng::from_seed(9), &mut row);

        assert_eq!(lazy, row);
    }

    #[test]
    fn test_path_consumes_horizon_draws() {
        let simulator = PathSimulator::new(GbmParams::new(100.0, 0.05, 0.2, 20)).unwrap();
        let mut rng = SimRng::from_seed(3);
        let mut reference = SimRng::from_seed(3);

        let _ = simulator.simulate(&mut rng);
        for _ in 0..20 {
            reference.gen_normal();
        }

        assert_eq!(rng.gen_normal(), reference.gen_normal());
    }

    #[test]
    fn test_iterator_exact_size() {
        let simulator = PathSimulator::new(GbmParams::new(100.0, 0.05, 0.2, 5)).unwrap();
        let mut iter = simulator.path(SimRng::from_seed(0));

        assert_eq!(iter.len(), 6);
        iter.next();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.by_ref().count(), 5);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_zero_volatility_is_deterministic() {
        let params = GbmParams::new(1_000.0, 0.1, 0.0, 252);
        let simulator = PathSimulator::new(params).unwrap();
        let path = simulator.simulate(&mut SimRng::from_seed(77));

        for (day, &value) in path.iter().enumerate() {
            let expected = 1_000.0 * (0.1 * params.dt() * day as f64).exp();
            assert_relative_eq!(value, expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_short_replay_pads_with_zero_shocks() {
        let params = GbmParams::new(100.0, 0.08, 0.25, 4);
        let simulator = PathSimulator::new(params).unwrap();
        let mut shocks = ShockReplay::new([0.5, -0.5]);

        let path = simulator.simulate(&mut shocks);

        assert_eq!(shocks.padded(), 2);
        let drift_only = params.drift_term().exp();
        assert_relative_eq!(path[3], path[2] * drift_only, max_relative = 1e-12);
        assert_relative_eq!(path[4], path[3] * drift_only, max_relative = 1e-12);
    }

    #[test]
    fn test_exact_replay_is_not_padded() {
        let simulator = PathSimulator::new(GbmParams::new(100.0, 0.08, 0.25, 3)).unwrap();
        let mut shocks = ShockReplay::new([0.3, -1.2, 2.0]);

        simulator.simulate(&mut shocks);
        assert_eq!(shocks.padded(), 0);
    }

    #[test]
    fn test_extreme_shocks_stay_positive() {
        let simulator = PathSimulator::new(GbmParams::new(1.0, 0.0, 2.0, 4)).unwrap();
        let path = simulator.simulate(&mut ShockReplay::new([-8.0, -8.0, -8.0, -8.0]));

        assert!(path.iter().all(|&v| v > 0.0));
    }

    #[test]
    #[should_panic(expected = "row length")]
    fn test_simulate_into_wrong_length() {
        let simulator = PathSimulator::new(GbmParams::new(100.0, 0.05, 0.2, 5)).unwrap();
        let mut row = vec![0.0; 3];
        simulator.simulate_into(&mut SimRng::from_seed(0), &mut row);
    }
}
