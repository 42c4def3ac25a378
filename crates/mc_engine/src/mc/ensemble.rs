//! Ensemble orchestration.
//!
//! [`SimulationEnsemble`] drives a [`PathSimulator`] once per path, collects
//! the rows into an [`Ensemble`] matrix and summarises the terminal column.
//!
//! # Memory Layout
//!
//! The matrix is row-major: `values[path * (horizon_days + 1) + day]`, with
//! `day = 0` holding the initial value.

use rayon::prelude::*;
use tracing::{debug, info};

use super::config::{ExecutionMode, SimulationConfig};
use super::error::SimulationError;
use super::paths::PathSimulator;
use super::statistics::{Histogram, PercentileBand, SummaryStatistics};
use crate::rng::SimRng;

/// Simulated price paths, one row per path.
///
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Ensemble {
    values: Vec<f64>,
    num_paths: usize,
    path_len: usize,
}

impl Ensemble {
    /// Returns `(num_paths, horizon_days + 1)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.num_paths, self.path_len)
    }

    /// Returns the number of paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Returns the number of values per path.
    #[inline]
    pub fn path_len(&self) -> usize {
        self.path_len
    }

    /// Returns the raw row-major matrix.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns path `index`, or `None` if out of range.
    #[inline]
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        if index >= self.num_paths {
            return None;
        }
        let start = index * self.path_len;
        Some(&self.values[start..start + self.path_len])
    }

    /// Iterates over paths in order.
    #[inline]
    pub fn paths(&self) -> std::slice::ChunksExact<'_, f64> {
        self.values.chunks_exact(self.path_len)
    }

    /// Returns the value of path `path` at `day`, or `None` if out of range.
    #[inline]
    pub fn value(&self, path: usize, day: usize) -> Option<f64> {
        if day >= self.path_len {
            return None;
        }
        self.path(path).map(|row| row[day])
    }

    /// Collects the cross-section at `day` (one value per path).
    pub fn column(&self, day: usize) -> Option<Vec<f64>> {
        if day >= self.path_len {
            return None;
        }
        Some(self.paths().map(|row| row[day]).collect())
    }

    /// Collects the terminal value of every path.
    pub fn terminal_values(&self) -> Vec<f64> {
        self.paths().map(|row| row[self.path_len - 1]).collect()
    }

    /// Consumes the ensemble, returning the raw row-major matrix.
    #[inline]
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

/// Output of one ensemble run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationResult {
    /// Full path matrix.
    pub ensemble: Ensemble,
    /// Terminal-value summary.
    pub statistics: SummaryStatistics,
    /// Seed of the stream the run drew from. For parallel runs this is the
    /// base seed of the per-path streams.
    pub seed: u64,
}

impl SimulationResult {
    /// Computes the {5, 25, 50, 75, 95} percentile band for every day.
    pub fn percentile_bands(&self) -> Vec<PercentileBand> {
        let (_, path_len) = self.ensemble.shape();
        let mut column = Vec::with_capacity(self.ensemble.num_paths());
        (0..path_len)
            .map(|day| {
                column.clear();
                column.extend(self.ensemble.paths().map(|row| row[day]));
                PercentileBand::from_values(day, &column)
            })
            .collect()
    }

    /// Terminal returns in percent of the initial value.
    pub fn terminal_returns(&self) -> Vec<f64> {
        let initial = self.statistics.initial_value;
        self.ensemble
            .terminal_values()
            .into_iter()
            .map(|v| (v - initial) / initial * 100.0)
            .collect()
    }

    /// Histogram of terminal values.
    pub fn terminal_histogram(&self, bins: usize) -> Option<Histogram> {
        Histogram::from_values(&self.ensemble.terminal_values(), bins)
    }

    /// Histogram of terminal returns in percent.
    pub fn return_histogram(&self, bins: usize) -> Option<Histogram> {
        Histogram::from_values(&self.terminal_returns(), bins)
    }

    /// Returns up to `count` leading paths, for plotting samples.
    pub fn sample_paths(&self, count: usize) -> impl Iterator<Item = &[f64]> {
        self.ensemble.paths().take(count)
    }
}

/// Monte Carlo ensemble runner.
///
/// Construction validates the configuration and performs no simulation.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::{SimulationConfig, SimulationEnsemble};
///
/// let config = SimulationConfig::builder()
///     .initial_value(10_000.0)
///     .horizon_days(252)
///     .num_paths(1_000)
///     .annual_drift(0.1245)
///     .annual_volatility(0.1876)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let result = SimulationEnsemble::new(config).unwrap().run().unwrap();
///
/// assert_eq!(result.ensemble.shape(), (1_000, 253));
/// assert!(result.statistics.percentile_5 <= result.statistics.median);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationEnsemble {
    config: SimulationConfig,
    simulator: PathSimulator,
}

impl SimulationEnsemble {
    /// Creates an ensemble runner.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if
    /// [`SimulationConfig::validate`] fails.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let simulator = PathSimulator::new(config.gbm_params())?;
        Ok(Self { config, simulator })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the per-path simulator.
    #[inline]
    pub fn simulator(&self) -> &PathSimulator {
        &self.simulator
    }

    /// Runs the full simulation with a freshly owned stream.
    ///
    /// Uses the configured seed, or one drawn from entropy when unset.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] only if the ensemble holds
    /// no path, which a validated configuration rules out.
    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        let seed = match self.config.seed() {
            Some(seed) => seed,
            None => SimRng::from_entropy().seed(),
        };

        match self.config.execution() {
            ExecutionMode::Sequential => self.run_with_rng(&mut SimRng::from_seed(seed)),
            ExecutionMode::Parallel => self.run_parallel(seed),
        }
    }

    /// Runs sequentially, drawing from a caller-owned stream.
    ///
    /// Paths are simulated in order, each consuming `horizon_days` draws, so
    /// the stream is left advanced by `num_paths · horizon_days` draws. The
    /// configured seed and execution mode are ignored.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn run_with_rng(&self, rng: &mut SimRng) -> Result<SimulationResult, SimulationError> {
        let (num_paths, path_len) = self.shape();
        info!(
            num_paths,
            horizon_days = self.config.horizon_days(),
            seed = rng.seed(),
            "Running sequential ensemble"
        );

        let mut values = vec![0.0; num_paths * path_len];
        for row in values.chunks_exact_mut(path_len) {
            self.simulator.simulate_into(rng, row);
        }

        self.finish(values, rng.seed())
    }

    /// Runs across rayon workers; path `i` draws from
    /// `SimRng::from_seed(base_seed.wrapping_add(i))`.
    fn run_parallel(&self, base_seed: u64) -> Result<SimulationResult, SimulationError> {
        let (num_paths, path_len) = self.shape();
        info!(
            num_paths,
            horizon_days = self.config.horizon_days(),
            seed = base_seed,
            "Running parallel ensemble"
        );

        let mut values = vec![0.0; num_paths * path_len];
        values
            .par_chunks_exact_mut(path_len)
            .enumerate()
            .for_each(|(index, row)| {
                let mut rng = SimRng::from_seed(base_seed.wrapping_add(index as u64));
                self.simulator.simulate_into(&mut rng, row);
            });

        self.finish(values, base_seed)
    }

    fn shape(&self) -> (usize, usize) {
        (self.config.num_paths(), self.simulator.path_len())
    }

    fn finish(&self, values: Vec<f64>, seed: u64) -> Result<SimulationResult, SimulationError> {
        let (num_paths, path_len) = self.shape();
        let ensemble = Ensemble {
            values,
            num_paths,
            path_len,
        };

        let terminal = ensemble.terminal_values();
        let statistics =
            SummaryStatistics::from_terminal_values(&terminal, self.config.initial_value())
                .ok_or_else(|| SimulationError::invalid("num_paths", "ensemble holds no path"))?;

        debug!(
            mean = statistics.mean,
            median = statistics.median,
            std_dev = statistics.std_dev,
            probability_of_profit = statistics.probability_of_profit,
            "Ensemble complete"
        );

        Ok(SimulationResult {
            ensemble,
            statistics,
            seed,
        })
    }
}
