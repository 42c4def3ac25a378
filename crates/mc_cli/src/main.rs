//! mc-sim - Portfolio Monte Carlo simulation
//!
//! # Commands
//!
//! - `mc-sim run` - Simulate and print the terminal-value report
//! - `mc-sim check` - Validate the effective configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mc_cli::commands::{self, run::OutputFormat, run::RunOptions};
use mc_cli::config::{AppConfig, SimulationOverrides};
use mc_cli::Result;

/// Portfolio Monte Carlo simulation CLI
#[derive(Parser)]
#[command(name = "mc-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to ./mc-sim.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Simulation parameter overrides shared by all commands
#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Initial investment value
    #[arg(long)]
    initial_value: Option<f64>,

    /// Horizon in trading days
    #[arg(long)]
    horizon_days: Option<usize>,

    /// Number of simulated paths
    #[arg(short = 'n', long)]
    num_paths: Option<usize>,

    /// Annualised expected return, e.g. 0.1245
    #[arg(long, allow_negative_numbers = true)]
    annual_drift: Option<f64>,

    /// Annualised volatility, e.g. 0.1876
    #[arg(long, allow_negative_numbers = true)]
    annual_volatility: Option<f64>,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulate paths in parallel with per-path streams
    #[arg(long)]
    parallel: bool,
}

impl From<OverrideArgs> for SimulationOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            initial_value: args.initial_value,
            horizon_days: args.horizon_days,
            num_paths: args.num_paths,
            annual_drift: args.annual_drift,
            annual_volatility: args.annual_volatility,
            seed: args.seed,
            parallel: args.parallel,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate and print the terminal-value report
    Run {
        #[command(flatten)]
        overrides: OverrideArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write per-day percentile bands to this CSV file
        #[arg(long)]
        bands_csv: Option<PathBuf>,

        /// Write sample paths to this CSV file
        #[arg(long)]
        paths_csv: Option<PathBuf>,

        /// Print a histogram of terminal returns (table format only)
        #[arg(long)]
        histogram: bool,
    },

    /// Validate the effective configuration
    Check {
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let base = AppConfig::load_or_default(cli.config.as_deref())?.with_env_override()?;

    match cli.command {
        Commands::Run {
            overrides,
            format,
            bands_csv,
            paths_csv,
            histogram,
        } => {
            let config = base.with_cli_override(&overrides.into());
            let options = RunOptions {
                format,
                bands_csv,
                paths_csv,
                histogram,
            };
            commands::run::run(&config, &options)
        }
        Commands::Check { overrides } => {
            let config = base.with_cli_override(&overrides.into());
            commands::check::run(&config)
        }
    }
}
