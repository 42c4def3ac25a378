//! # mc-sim
//!
//! Command-line runner for the portfolio Monte Carlo engine.
//!
//! Configuration is layered: built-in defaults, then a TOML file, then `MC_*`
//! environment variables, then command-line flags. The `run` command prints
//! the terminal-value report and can export per-day percentile bands and
//! sample paths as CSV for charting.

pub mod commands;
pub mod config;
pub mod error;
pub mod report;

pub use error::{CliError, Result};
