//! Simulation configuration.
//!
//! This module provides [`SimulationConfig`] and its validating builder. A
//! built configuration is always valid; every precondition is checked before
//! any simulation work can start.

use super::error::SimulationError;
use super::paths::GbmParams;

/// Trading days per year assumed when converting annualised parameters to a
/// daily step.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// How an ensemble distributes path simulation.
///
/// # Reproducibility
///
/// - `Sequential`: one stream, consumed path-major then day-minor. Path `i`
///   uses draws `i·h .. (i+1)·h` where `h = horizon_days`.
/// - `Parallel`: path `i` owns a stream seeded with `seed + i` (wrapping).
///   Still deterministic for a fixed seed, but not bit-identical to
///   `Sequential`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExecutionMode {
    /// Single shared stream, paths simulated in order.
    #[default]
    Sequential,
    /// Rayon across paths, one independently seeded stream per path.
    Parallel,
}

/// Monte Carlo simulation configuration.
///
/// Immutable; use [`SimulationConfig::builder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use mc_engine::mc::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .initial_value(10_000.0)
///     .horizon_days(252)
///     .num_paths(10_000)
///     .annual_drift(0.1245)
///     .annual_volatility(0.1876)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.num_paths(), 10_000);
/// assert_eq!(config.horizon_days(), 252);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimulationConfig {
    initial_value: f64,
    horizon_days: usize,
    num_paths: usize,
    annual_drift: f64,
    annual_volatility: f64,
    seed: Option<u64>,
    trading_days_per_year: f64,
    execution: ExecutionMode,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Returns the initial investment value.
    #[inline]
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Returns the horizon in trading days.
    #[inline]
    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    /// Returns the number of simulated paths.
    #[inline]
    pub fn num_paths(&self) -> usize {
        self.num_paths
    }

    /// Returns the annualised expected return.
    #[inline]
    pub fn annual_drift(&self) -> f64 {
        self.annual_drift
    }

    /// Returns the annualised volatility.
    #[inline]
    pub fn annual_volatility(&self) -> f64 {
        self.annual_volatility
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the number of trading days per year used for `dt`.
    #[inline]
    pub fn trading_days_per_year(&self) -> f64 {
        self.trading_days_per_year
    }

    /// Returns the execution mode.
    #[inline]
    pub fn execution(&self) -> ExecutionMode {
        self.execution
    }

    /// Returns the per-path model parameters (everything but the path count,
    /// seed and execution mode).
    #[inline]
    pub fn gbm_params(&self) -> GbmParams {
        GbmParams {
            initial_value: self.initial_value,
            annual_drift: self.annual_drift,
            annual_volatility: self.annual_volatility,
            horizon_days: self.horizon_days,
            trading_days_per_year: self.trading_days_per_year,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if:
    /// - `num_paths` is 0
    /// - the ensemble matrix would exceed `isize::MAX` bytes
    /// - any [`GbmParams::validate`] condition fails
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_paths == 0 {
            return Err(SimulationError::invalid(
                "num_paths",
                "must be at least 1, got 0",
            ));
        }
        self.gbm_params().validate()?;

        let bytes = self
            .horizon_days
            .checked_add(1)
            .and_then(|row| row.checked_mul(self.num_paths))
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<f64>()));
        if !matches!(bytes, Some(bytes) if bytes <= isize::MAX as usize) {
            return Err(SimulationError::invalid(
                "num_paths",
                format!(
                    "{} paths of {} days exceed the addressable ensemble matrix",
                    self.num_paths, self.horizon_days
                ),
            ));
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
///
/// `initial_value`, `horizon_days`, `num_paths`, `annual_drift` and
/// `annual_volatility` are required. `trading_days_per_year` defaults to
/// [`TRADING_DAYS_PER_YEAR`], `execution` to [`ExecutionMode::Sequential`],
/// and `seed` to none (entropy-seeded run).
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    initial_value: Option<f64>,
    horizon_days: Option<usize>,
    num_paths: Option<usize>,
    annual_drift: Option<f64>,
    annual_volatility: Option<f64>,
    seed: Option<u64>,
    trading_days_per_year: Option<f64>,
    execution: ExecutionMode,
}

impl SimulationConfigBuilder {
    /// Sets the initial investment value (must be positive).
    #[inline]
    pub fn initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = Some(initial_value);
        self
    }

    /// Sets the horizon in trading days (must be at least 1).
    #[inline]
    pub fn horizon_days(mut self, horizon_days: usize) -> Self {
        self.horizon_days = Some(horizon_days);
        self
    }

    /// Sets the number of simulated paths (must be at least 1).
    #[inline]
    pub fn num_paths(mut self, num_paths: usize) -> Self {
        self.num_paths = Some(num_paths);
        self
    }

    /// Sets the annualised expected return.
    #[inline]
    pub fn annual_drift(mut self, annual_drift: f64) -> Self {
        self.annual_drift = Some(annual_drift);
        self
    }

    /// Sets the annualised volatility (must be non-negative).
    #[inline]
    pub fn annual_volatility(mut self, annual_volatility: f64) -> Self {
        self.annual_volatility = Some(annual_volatility);
        self
    }

    /// Sets the seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets or clears the seed.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the number of trading days per year (default 252).
    #[inline]
    pub fn trading_days_per_year(mut self, days: f64) -> Self {
        self.trading_days_per_year = Some(days);
        self
    }

    /// Sets the execution mode.
    #[inline]
    pub fn execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] if a required field is not
    /// set or [`SimulationConfig::validate`] fails.
    pub fn build(self) -> Result<SimulationConfig, SimulationError> {
        let config = SimulationConfig {
            initial_value: required(self.initial_value, "initial_value")?,
            horizon_days: required(self.horizon_days, "horizon_days")?,
            num_paths: required(self.num_paths, "num_paths")?,
            annual_drift: required(self.annual_drift, "annual_drift")?,
            annual_volatility: required(self.annual_volatility, "annual_volatility")?,
            seed: self.seed,
            trading_days_per_year: self.trading_days_per_year.unwrap_or(TRADING_DAYS_PER_YEAR),
            execution: self.execution,
        };

        config.validate()?;
        Ok(config)
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, SimulationError> {
    value.ok_or_else(|| SimulationError::invalid(name, "must be specified"))
}
