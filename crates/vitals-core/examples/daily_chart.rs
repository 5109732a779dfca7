//! Example: Building a Chart from a Record Export
//!
//! This example reads a JSON array of records, builds one of the preset
//! charts and prints every retained point with its label.
//!
//! Run with: `cargo run --example daily_chart -- <RECORDS.json> [activity|nutrition|sleep|blood_markers]`

use std::env;
use std::fs;

use vitals_core::{ChartConfig, EngineConfig, build_chart};
use vitals_types::RawRecord;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("Usage: {} <RECORDS.json> [CHART]", args[0]);
        eprintln!();
        eprintln!("Charts: activity, nutrition, sleep, blood_markers");
        std::process::exit(1);
    };
    let chart_name = args.get(2).map(String::as_str).unwrap_or("activity");

    let records: Vec<RawRecord> = serde_json::from_str(&fs::read_to_string(path)?)?;
    println!("Loaded {} records from {}", records.len(), path);

    let config = if chart_name == "blood_markers" {
        ChartConfig::blood_markers_in(&records)
    } else {
        ChartConfig::preset(chart_name).ok_or_else(|| format!("unknown chart: {chart_name}"))?
    };

    let chart = build_chart(&records, &config, &EngineConfig::default());
    println!(
        "{}: {} of {} days plotted ({} tier), {} skipped",
        chart.chart,
        chart.len(),
        chart.original_len,
        chart.tier(),
        chart.skipped.total()
    );
    println!();

    for (i, date) in chart.dates.iter().enumerate() {
        let values: Vec<String> = chart
            .datasets
            .iter()
            .map(|d| match d.values[i] {
                Some(v) => format!("{}={:.1}", d.name, v),
                None => format!("{}=-", d.name),
            })
            .collect();
        println!("{:>8}  {}  {}", chart.labels[i], date, values.join("  "));
    }

    Ok(())
}
