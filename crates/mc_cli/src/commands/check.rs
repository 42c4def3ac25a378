//! Check command implementation
//!
//! Validates the effective configuration without simulating.

use tracing::info;

use crate::config::AppConfig;
use crate::Result;

/// Run the check command
pub fn run(config: &AppConfig) -> Result<()> {
    config.validate()?;
    let simulation = config.simulation_config()?;

    info!("Configuration is valid");
    println!("initial_value         = {}", simulation.initial_value());
    println!("horizon_days          = {}", simulation.horizon_days());
    println!("num_paths             = {}", simulation.num_paths());
    println!("annual_drift          = {}", simulation.annual_drift());
    println!("annual_volatility     = {}", simulation.annual_volatility());
    match simulation.seed() {
        Some(seed) => println!("seed                  = {}", seed),
        None => println!("seed                  = (entropy)"),
    }
    println!("trading_days_per_year = {}", simulation.trading_days_per_year());
    println!("execution             = {:?}", simulation.execution());
    Ok(())
}
