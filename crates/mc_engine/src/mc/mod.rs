//! Monte Carlo path simulation for a single investment.
//!
//! # Architecture
//!
//! ```text
//! SimulationEnsemble
//! ├── SimulationConfig  (validated parameters)
//! ├── PathSimulator     (one GBM path per call)
//! ├── SimRng            (owned random stream)
//! └── Aggregation
//!     ├── Ensemble          (num_paths × (horizon_days + 1) matrix)
//!     ├── SummaryStatistics (terminal column)
//!     └── PercentileBand    (per-day cross-sections)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use mc_engine::mc::{SimulationConfig, SimulationEnsemble};
//!
//! let config = SimulationConfig::builder()
//!     .initial_value(10_000.0)
//!     .horizon_days(252)
//!     .num_paths(2_000)
//!     .annual_drift(0.1245)
//!     .annual_volatility(0.1876)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let result = SimulationEnsemble::new(config).unwrap().run().unwrap();
//! let stats = &result.statistics;
//!
//! println!("Mean: {:.0}  Median: {:.0}", stats.mean, stats.median);
//! println!("Probability of profit: {:.1}%", 100.0 * stats.probability_of_profit);
//!
//! let bands = result.percentile_bands();
//! assert_eq!(bands.len(), 253);
//! ```

pub mod config;
pub mod ensemble;
pub mod error;
pub mod paths;
pub mod statistics;

// Re-exports for convenient access
pub use config::{ExecutionMode, SimulationConfig, SimulationConfigBuilder, TRADING_DAYS_PER_YEAR};
pub use ensemble::{Ensemble, SimulationEnsemble, SimulationResult};
pub use error::SimulationError;
pub use paths::{GbmParams, PathIter, PathSimulator};
pub use statistics::{
    percentile_sorted, sorted_copy, Histogram, PercentileBand, SummaryStatistics, BAND_LEVELS,
};
