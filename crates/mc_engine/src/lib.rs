//! # Portfolio Monte Carlo Engine
//!
//! Estimates how an investment's value might evolve under uncertain daily
//! returns. Given an annualised drift and volatility, the engine simulates an
//! ensemble of geometric Brownian motion paths over a trading horizon and
//! summarises the terminal distribution.
//!
//! ## Modules
//!
//! - [`rng`]: owned, seeded normal-shock streams
//! - [`mc`]: path simulation, ensemble orchestration and statistics
//!
//! ## Reproducibility
//!
//! A seeded sequential run consumes one stream path-major, day-minor, so the
//! same seed and configuration always produce a bit-identical ensemble.
//! Parallel runs seed one stream per path instead (see
//! [`mc::ExecutionMode`]).
//!
//! ## Usage Example
//!
//! ```rust
//! use mc_engine::mc::{SimulationConfig, SimulationEnsemble};
//!
//! let config = SimulationConfig::builder()
//!     .initial_value(10_000.0)
//!     .horizon_days(21)
//!     .num_paths(500)
//!     .annual_drift(0.08)
//!     .annual_volatility(0.15)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let first = SimulationEnsemble::new(config.clone()).unwrap().run().unwrap();
//! let second = SimulationEnsemble::new(config).unwrap().run().unwrap();
//! assert_eq!(first.ensemble, second.ensemble);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;
