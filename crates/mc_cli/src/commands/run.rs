//! Run command implementation
//!
//! Simulates the ensemble and prints the report, optionally exporting
//! percentile bands and sample paths for charting.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use mc_engine::mc::{SimulationEnsemble, SimulationResult};
use tracing::info;

use crate::config::AppConfig;
use crate::report::{self, JsonReport};
use crate::{CliError, Result};

/// Report format on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Options of the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Report format
    pub format: OutputFormat,
    /// Per-day percentile band CSV destination
    pub bands_csv: Option<PathBuf>,
    /// Sample path CSV destination
    pub paths_csv: Option<PathBuf>,
    /// Print a terminal-return histogram after the table
    pub histogram: bool,
}

impl RunOptions {
    /// Reject option combinations that cannot be honoured
    pub fn validate(&self) -> Result<()> {
        if self.histogram && self.format == OutputFormat::Json {
            return Err(CliError::InvalidArgument(
                "--histogram is only available with --format table".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run the simulation and write the report to stdout
pub fn run(config: &AppConfig, options: &RunOptions) -> Result<()> {
    options.validate()?;
    let stdout = io::stdout();
    let result = simulate(config)?;
    write_outputs(config, options, &result, stdout.lock())
}

/// Build and run the ensemble described by `config`
pub fn simulate(config: &AppConfig) -> Result<SimulationResult> {
    config.validate()?;
    let simulation = config.simulation_config()?;

    info!("Starting simulation...");
    info!("  Initial value: {}", simulation.initial_value());
    info!("  Horizon: {} days", simulation.horizon_days());
    info!("  Paths: {}", simulation.num_paths());
    info!("  Execution: {:?}", simulation.execution());

    let result = SimulationEnsemble::new(simulation)?.run()?;
    info!("Simulation complete (seed {})", result.seed);
    Ok(result)
}

/// Write the report to `out` and any requested CSV files
pub fn write_outputs<W: Write>(
    config: &AppConfig,
    options: &RunOptions,
    result: &SimulationResult,
    mut out: W,
) -> Result<()> {
    options.validate()?;
    let simulation = config.simulation_config()?;

    match options.format {
        OutputFormat::Table => {
            let table = report::format_table(&simulation, &result.statistics, result.seed);
            out.write_all(table.as_bytes())?;
            if options.histogram {
                if let Some(histogram) = result.return_histogram(config.report.histogram_bins) {
                    writeln!(out, "\nDISTRIBUTION OF RETURNS:")?;
                    out.write_all(report::format_histogram(&histogram, "%").as_bytes())?;
                }
            }
        }
        OutputFormat::Json => {
            let json = JsonReport {
                config: &simulation,
                seed: result.seed,
                statistics: &result.statistics,
            };
            report::write_json(&mut out, &json)?;
            writeln!(out)?;
        }
    }

    if let Some(path) = &options.bands_csv {
        info!("Writing percentile bands to {}", path.display());
        let file = BufWriter::new(File::create(path)?);
        report::write_bands_csv(file, &result.percentile_bands())?;
    }

    if let Some(path) = &options.paths_csv {
        let count = config.report.sample_paths;
        info!("Writing {} sample paths to {}", count, path.display());
        let file = BufWriter::new(File::create(path)?);
        report::write_paths_csv(file, result.ensemble.path_len(), result.sample_paths(count))?;
    }

    Ok(())
}
