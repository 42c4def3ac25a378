//! End-to-end tests of the run command: configuration layering, simulation,
//! report rendering and CSV export.

use approx::assert_relative_eq;
use mc_cli::commands::run::{simulate, write_outputs, OutputFormat, RunOptions};
use mc_cli::config::{AppConfig, SimulationOverrides};
use mc_cli::CliError;

fn small_config() -> AppConfig {
    AppConfig::from_toml(
        r#"
        [simulation]
        initial_value = 10000.0
        horizon_days = 21
        num_paths = 400
        annual_drift = 0.1245
        annual_volatility = 0.1876
        seed = 42

        [report]
        sample_paths = 5
        histogram_bins = 10
        "#,
    )
    .unwrap()
}

#[test]
fn test_table_report_with_histogram() {
    let config = small_config();
    let result = simulate(&config).unwrap();
    let options = RunOptions {
        histogram: true,
        ..Default::default()
    };

    let mut out = Vec::new();
    write_outputs(&config, &options, &result, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("MONTE CARLO SIMULATION RESULTS"));
    assert!(text.contains("Number of Simulations: 400"));
    assert!(text.contains("DISTRIBUTION OF RETURNS:"));
    let bars = text.lines().filter(|line| line.contains(" | ")).count();
    assert_eq!(bars, 10);
}

#[test]
fn test_json_report_round_trips_statistics() {
    let config = small_config();
    let result = simulate(&config).unwrap();
    let options = RunOptions {
        format: OutputFormat::Json,
        ..Default::default()
    };

    let mut out = Vec::new();
    write_outputs(&config, &options, &result, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(value["seed"], 42);
    let mean = value["statistics"]["mean"].as_f64().unwrap();
    assert_relative_eq!(mean, result.statistics.mean, max_relative = 1e-12);
}

#[test]
fn test_csv_exports() {
    let dir = tempfile::tempdir().unwrap();
    let bands_path = dir.path().join("bands.csv");
    let paths_path = dir.path().join("paths.csv");

    let config = small_config();
    let result = simulate(&config).unwrap();
    let options = RunOptions {
        bands_csv: Some(bands_path.clone()),
        paths_csv: Some(paths_path.clone()),
        ..Default::default()
    };
    write_outputs(&config, &options, &result, std::io::sink()).unwrap();

    let bands = std::fs::read_to_string(&bands_path).unwrap();
    assert_eq!(bands.lines().count(), 1 + 22);
    assert!(bands.starts_with("day,p5,p25,p50,p75,p95"));

    let paths = std::fs::read_to_string(&paths_path).unwrap();
    let mut lines = paths.lines();
    let header = lines.next().unwrap();
    assert_eq!(header.split(',').count(), 1 + 22);
    assert_eq!(lines.count(), 5);
}

#[test]
fn test_seeded_runs_match_across_invocations() {
    let config = small_config();
    let first = simulate(&config).unwrap();
    let second = simulate(&config).unwrap();

    assert_eq!(first.ensemble, second.ensemble);
}

#[test]
fn test_invalid_override_is_rejected_before_simulation() {
    let overrides = SimulationOverrides {
        num_paths: Some(0),
        ..Default::default()
    };
    let config = small_config().with_cli_override(&overrides);

    match simulate(&config) {
        Err(CliError::Simulation(err)) => assert_eq!(err.parameter(), "num_paths"),
        other => panic!("expected simulation error, got {:?}", other.map(|r| r.seed)),
    }
}

#[test]
fn test_histogram_with_json_is_rejected() {
    let config = small_config();
    let result = simulate(&config).unwrap();
    let options = RunOptions {
        format: OutputFormat::Json,
        histogram: true,
        ..Default::default()
    };

    let mut out = Vec::new();
    let err = write_outputs(&config, &options, &result, &mut out).unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument(_)));
    assert!(out.is_empty());
}

#[test]
fn test_config_without_seed_draws_fresh_seeds() {
    let mut config = small_config();
    config.simulation.seed = None;
    config.simulation.num_paths = 10;

    let first = simulate(&config).unwrap();
    let second = simulate(&config).unwrap();

    assert_ne!(first.seed, second.seed);
    assert_ne!(first.ensemble, second.ensemble);
}
