//! Report formatting and file export.
//!
//! Renders the terminal-value summary as a text table or JSON, draws a text
//! histogram of terminal returns, and writes percentile bands and sample
//! paths as CSV for external charting.

use std::io;

use mc_engine::mc::{Histogram, PercentileBand, SimulationConfig, SummaryStatistics};
use serde::Serialize;

use crate::Result;

/// Width of the longest histogram bar, in characters.
const HISTOGRAM_WIDTH: usize = 50;

/// JSON report body.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Effective simulation configuration
    pub config: &'a SimulationConfig,
    /// Seed the run drew from
    pub seed: u64,
    /// Terminal-value summary
    pub statistics: &'a SummaryStatistics,
}

/// Formats a value as whole dollars with thousands separators, e.g. `$11,326`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Formats an integer count with thousands separators.
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Renders the text summary report.
pub fn format_table(config: &SimulationConfig, stats: &SummaryStatistics, seed: u64) -> String {
    let years = config.horizon_days() as f64 / config.trading_days_per_year();

    let lines = [
        "MONTE CARLO SIMULATION RESULTS".to_string(),
        format!("Initial Investment: {}", format_currency(config.initial_value())),
        format!(
            "Time Horizon: {} days ({:.2} years)",
            config.horizon_days(),
            years
        ),
        format!("Number of Simulations: {}", format_count(config.num_paths())),
        format!(
            "Drift / Volatility: {:.2}% / {:.2}% (seed {})",
            100.0 * config.annual_drift(),
            100.0 * config.annual_volatility(),
            seed
        ),
        String::new(),
        "FINAL PORTFOLIO VALUE STATISTICS:".to_string(),
        format!("Mean: {}", format_currency(stats.mean)),
        format!("Median: {}", format_currency(stats.median)),
        format!("Std Dev: {}", format_currency(stats.std_dev)),
        String::new(),
        format!(
            "5th Percentile (Worst 5%): {}",
            format_currency(stats.percentile_5)
        ),
        format!(
            "95th Percentile (Best 5%): {}",
            format_currency(stats.percentile_95)
        ),
        String::new(),
        format!("Worst Case: {}", format_currency(stats.min)),
        format!("Best Case: {}", format_currency(stats.max)),
        String::new(),
        format!(
            "Probability of Profit: {:.1}%",
            100.0 * stats.probability_of_profit
        ),
        format!("Mean Return: {:.1}%", stats.mean_return_pct),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Renders a histogram as one text bar per bin, scaled to the largest count.
pub fn format_histogram(histogram: &Histogram, unit: &str) -> String {
    let peak = histogram.counts.iter().copied().max().unwrap_or(0).max(1);

    histogram
        .counts
        .iter()
        .zip(histogram.edges.windows(2))
        .map(|(&count, edges)| {
            let bar = count * HISTOGRAM_WIDTH / peak;
            format!(
                "{:>9.1}{unit} .. {:>9.1}{unit} | {:<width$} {}\n",
                edges[0],
                edges[1],
                "#".repeat(bar),
                count,
                unit = unit,
                width = HISTOGRAM_WIDTH,
            )
        })
        .collect()
}

/// Writes the JSON report.
pub fn write_json<W: io::Write>(writer: W, report: &JsonReport<'_>) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Writes per-day percentile bands as CSV with a `day,p5,p25,p50,p75,p95`
/// header.
pub fn write_bands_csv<W: io::Write>(writer: W, bands: &[PercentileBand]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for band in bands {
        csv.serialize(band)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes paths as CSV, one row per path: `path,day_0,day_1,...`.
pub fn write_paths_csv<'a, W, I>(writer: W, path_len: usize, paths: I) -> Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(path_len + 1);
    header.push("path".to_string());
    header.extend((0..path_len).map(|day| format!("day_{}", day)));
    csv.write_record(&header)?;

    for (index, row) in paths.into_iter().enumerate() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(index.to_string());
        record.extend(row.iter().map(|v| v.to_string()));
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> SummaryStatistics {
        SummaryStatistics::from_terminal_values(&[9_000.0, 11_000.0, 12_500.0], 10_000.0)
            .unwrap()
    }

    fn config() -> SimulationConfig {
        SimulationConfig::builder()
            .initial_value(10_000.0)
            .horizon_days(252)
            .num_paths(3)
            .annual_drift(0.1245)
            .annual_volatility(0.1876)
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(10_000.0), "$10,000");
        assert_eq!(format_currency(11_325.6), "$11,326");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
        assert_eq!(format_currency(-2_500.0), "-$2,500");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1), "1");
        assert_eq!(format_count(10_000), "10,000");
        assert_eq!(format_count(100_000), "100,000");
    }

    #[test]
    fn test_format_table_contents() {
        let table = format_table(&config(), &stats(), 42);

        assert!(table.contains("Initial Investment: $10,000"));
        assert!(table.contains("Number of Simulations: 3"));
        assert!(table.contains("Median: $11,000"));
        assert!(table.contains("Worst Case: $9,000"));
        assert!(table.contains("Best Case: $12,500"));
        assert!(table.contains("Probability of Profit: 66.7%"));
    }

    #[test]
    fn test_format_table_layout() {
        let table = format_table(&config(), &stats(), 42);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 19);
        assert_eq!(lines[0], "MONTE CARLO SIMULATION RESULTS");
        assert_eq!(lines[2], "Time Horizon: 252 days (1.00 years)");
        assert_eq!(lines[4], "Drift / Volatility: 12.45% / 18.76% (seed 42)");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "FINAL PORTFOLIO VALUE STATISTICS:");
        assert_eq!(lines[18], "Mean Return: 8.3%");
        assert!(table.ends_with('\n'));
    }

    #[test]
    fn test_format_histogram_rows() {
        let histogram = Histogram::from_values(&[-10.0, 0.0, 5.0, 10.0], 2).unwrap();
        let text = format_histogram(&histogram, "%");

        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|line| line.contains('|')));
        assert!(text.lines().nth(1).unwrap().contains(&"#".repeat(HISTOGRAM_WIDTH)));
    }

    #[test]
    fn test_write_bands_csv() {
        let bands = [
            PercentileBand::from_values(0, &[100.0, 100.0]),
            PercentileBand::from_values(1, &[90.0, 110.0]),
        ];
        let mut buffer = Vec::new();
        write_bands_csv(&mut buffer, &bands).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("day,p5,p25,p50,p75,p95"));
        assert_eq!(lines.next(), Some("0,100.0,100.0,100.0,100.0,100.0"));
        assert_eq!(lines.next(), Some("1,91.0,95.0,100.0,105.0,109.0"));
    }

    #[test]
    fn test_write_paths_csv() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![1.0, 0.5]];
        let mut buffer = Vec::new();
        write_paths_csv(&mut buffer, 2, rows.iter().map(Vec::as_slice)).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "path,day_0,day_1\n0,1,2\n1,1,0.5\n");
    }

    #[test]
    fn test_write_json() {
        let config = config();
        let stats = stats();
        let report = JsonReport {
            config: &config,
            seed: 42,
            statistics: &stats,
        };

        let mut buffer = Vec::new();
        write_json(&mut buffer, &report).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["seed"], 42);
        assert_eq!(value["config"]["num_paths"], 3);
        assert_eq!(value["config"]["execution"], "sequential");
        assert_eq!(value["statistics"]["median"], 11_000.0);
    }
}
