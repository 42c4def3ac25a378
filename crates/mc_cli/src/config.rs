//! Run configuration management.
//!
//! Loads simulation and report settings from a TOML file, then applies
//! environment variable overrides. Command-line flags are applied on top by
//! the caller through [`SimulationOverrides`].

use mc_engine::mc::{ExecutionMode, SimulationConfig, SimulationError, TRADING_DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file looked up when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "mc-sim.toml";

/// Simulation parameters as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Initial investment value
    pub initial_value: f64,
    /// Horizon in trading days
    pub horizon_days: usize,
    /// Number of simulated paths
    pub num_paths: usize,
    /// Annualised expected return
    pub annual_drift: f64,
    /// Annualised volatility
    pub annual_volatility: f64,
    /// Seed; when omitted each run draws a fresh seed from entropy
    pub seed: Option<u64>,
    /// Trading days per year
    pub trading_days_per_year: f64,
    /// Simulate paths on the rayon pool with per-path streams
    pub parallel: bool,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            initial_value: 10_000.0,
            horizon_days: 252,
            num_paths: 10_000,
            annual_drift: 0.1245,
            annual_volatility: 0.1876,
            seed: None,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            parallel: false,
        }
    }
}

/// Report options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    /// Paths written by `--paths-csv`
    pub sample_paths: usize,
    /// Bins of the terminal-return histogram
    pub histogram_bins: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            sample_paths: 100,
            histogram_bins: 50,
        }
    }
}

/// Full CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Simulation parameters
    pub simulation: SimulationSection,
    /// Report options
    pub report: ReportSection,
}

/// Command-line overrides; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationOverrides {
    /// Initial investment value
    pub initial_value: Option<f64>,
    /// Horizon in trading days
    pub horizon_days: Option<usize>,
    /// Number of simulated paths
    pub num_paths: Option<usize>,
    /// Annualised expected return
    pub annual_drift: Option<f64>,
    /// Annualised volatility
    pub annual_volatility: Option<f64>,
    /// Seed
    pub seed: Option<u64>,
    /// Force parallel execution
    pub parallel: bool,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path` if given; otherwise [`DEFAULT_CONFIG_PATH`] when it exists,
    /// falling back to built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply `MC_*` environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Recognised variables: `MC_INITIAL_VALUE`, `MC_HORIZON_DAYS`,
    /// `MC_NUM_PATHS`, `MC_ANNUAL_DRIFT`, `MC_ANNUAL_VOLATILITY`, `MC_SEED`.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sim = &mut self.simulation;
        if let Some(value) = parse_var(&lookup, "MC_INITIAL_VALUE")? {
            sim.initial_value = value;
        }
        if let Some(value) = parse_var(&lookup, "MC_HORIZON_DAYS")? {
            sim.horizon_days = value;
        }
        if let Some(value) = parse_var(&lookup, "MC_NUM_PATHS")? {
            sim.num_paths = value;
        }
        if let Some(value) = parse_var(&lookup, "MC_ANNUAL_DRIFT")? {
            sim.annual_drift = value;
        }
        if let Some(value) = parse_var(&lookup, "MC_ANNUAL_VOLATILITY")? {
            sim.annual_volatility = value;
        }
        if let Some(value) = parse_var(&lookup, "MC_SEED")? {
            sim.seed = Some(value);
        }
        Ok(self)
    }

    /// Apply command-line overrides
    pub fn with_cli_override(mut self, overrides: &SimulationOverrides) -> Self {
        let sim = &mut self.simulation;
        if let Some(value) = overrides.initial_value {
            sim.initial_value = value;
        }
        if let Some(value) = overrides.horizon_days {
            sim.horizon_days = value;
        }
        if let Some(value) = overrides.num_paths {
            sim.num_paths = value;
        }
        if let Some(value) = overrides.annual_drift {
            sim.annual_drift = value;
        }
        if let Some(value) = overrides.annual_volatility {
            sim.annual_volatility = value;
        }
        if let Some(value) = overrides.seed {
            sim.seed = Some(value);
        }
        if overrides.parallel {
            sim.parallel = true;
        }
        self
    }

    /// Validate the report options
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.report.histogram_bins == 0 {
            errors.push("report.histogram_bins must be greater than 0".to_string());
        }
        if self.report.histogram_bins > 1_000 {
            errors.push(format!(
                "report.histogram_bins {} exceeds maximum allowed (1,000)",
                self.report.histogram_bins
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the engine configuration.
    ///
    /// Simulation parameters are validated by the engine's builder.
    pub fn simulation_config(&self) -> Result<SimulationConfig, SimulationError> {
        let sim = &self.simulation;
        let execution = if sim.parallel {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        };

        SimulationConfig::builder()
            .initial_value(sim.initial_value)
            .horizon_days(sim.horizon_days)
            .num_paths(sim.num_paths)
            .annual_drift(sim.annual_drift)
            .annual_volatility(sim.annual_volatility)
            .maybe_seed(sim.seed)
            .trading_days_per_year(sim.trading_days_per_year)
            .execution(execution)
            .build()
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { name, value: raw }),
    }
}

/// Configuration error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error reading {}: {message}", .path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error message
        message: String,
    },
    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),
    /// Unparseable environment override
    #[error("Invalid value '{value}' for environment variable {name}")]
    Env {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },
    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
