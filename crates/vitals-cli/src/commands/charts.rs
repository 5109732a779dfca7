//! Charts command implementation.

use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use vitals_core::{ChartConfig, PRESET_NAMES};

use crate::cli::OutputFormat;
use crate::config::{Config, resolve_chart};
use crate::format::{FormatOptions, format_charts_csv, format_charts_text};
use crate::util::write_output;

/// Where a chart definition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSource {
    /// Built-in preset.
    Preset,
    /// Built-in preset tuned in the config file.
    Override,
    /// Defined in the config file.
    Config,
}

impl fmt::Display for ChartSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartSource::Preset => write!(f, "preset"),
            ChartSource::Override => write!(f, "preset (config)"),
            ChartSource::Config => write!(f, "config"),
        }
    }
}

/// One row of the chart listing.
#[derive(Debug, Clone, Serialize)]
pub struct ChartEntry {
    pub name: String,
    pub source: ChartSource,
    pub max_points: i64,
    pub metrics: Vec<String>,
}

impl ChartEntry {
    fn new(chart: &ChartConfig, source: ChartSource) -> Self {
        let metrics = if chart.name == "blood_markers" && chart.metrics.is_empty() {
            vec!["(markers found in the input)".to_string()]
        } else {
            chart.metrics.iter().map(|spec| spec.name.clone()).collect()
        };
        Self {
            name: chart.name.clone(),
            source,
            max_points: chart.max_points.raw(),
            metrics,
        }
    }
}

/// Presets first, in their usual order, then charts defined in the config.
pub fn list_charts(config: &Config) -> Result<Vec<ChartEntry>> {
    let mut entries = Vec::new();
    for name in PRESET_NAMES {
        let chart = resolve_chart(name, config, &[])?;
        let source = if config.charts.contains_key(name) {
            ChartSource::Override
        } else {
            ChartSource::Preset
        };
        entries.push(ChartEntry::new(&chart, source));
    }
    for name in config.custom_chart_names() {
        let chart = resolve_chart(name, config, &[])?;
        entries.push(ChartEntry::new(&chart, ChartSource::Config));
    }
    Ok(entries)
}

pub fn cmd_charts(
    config: &Config,
    format: OutputFormat,
    output: Option<&PathBuf>,
    opts: &FormatOptions,
) -> Result<()> {
    let entries = list_charts(config)?;

    let content = match format {
        OutputFormat::Json => opts.as_json(&entries)?,
        OutputFormat::Csv => format_charts_csv(&entries, opts)?,
        OutputFormat::Text => format_charts_text(&entries, opts),
    };

    write_output(output, &content)
}
