//! Configuration file management.
//!
//! The file lives at `<config dir>/vitals/config.toml`:
//!
//! ```toml
//! format = "text"
//! reporting_offset = "+01:00"
//!
//! [charts.activity]
//! max_points = 90
//!
//! [charts.custom_hr]
//! max_points = 30
//! metrics = [{ name = "hr", metric = "heart_rate", reduction = "mean" }]
//! ```
//!
//! Entries under `[charts]` either tune a built-in preset of the same name
//! or, when they list `metrics`, define a new chart.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use time::Date;
use tracing::warn;
use vitals_core::{ChartConfig, EngineConfig, MetricSpec, PRESET_NAMES, PointBudget};
use vitals_types::date::serde_date;
use vitals_types::{RawRecord, ReportingOffset};

use crate::cli::OutputFormat;

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default output format
    #[serde(default)]
    pub format: Option<String>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Offset used to turn timestamps into calendar dates
    #[serde(default)]
    pub reporting_offset: Option<ReportingOffset>,

    /// Preset overrides and user-defined charts, by name
    #[serde(default)]
    pub charts: BTreeMap<String, ChartOverride>,
}

/// One `[charts.<name>]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartOverride {
    /// Point budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<i64>,

    /// Replacement metric columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<MetricSpec>>,

    /// First date kept
    #[serde(
        default,
        with = "serde_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub since: Option<Date>,

    /// Last date kept
    #[serde(
        default,
        with = "serde_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub until: Option<Date>,
}

impl ChartOverride {
    fn apply(&self, chart: &mut ChartConfig) {
        if let Some(max_points) = self.max_points {
            chart.max_points = PointBudget::new(max_points);
        }
        if let Some(metrics) = &self.metrics {
            chart.metrics = metrics.clone();
        }
        if self.since.is_some() {
            chart.range.since = self.since;
        }
        if self.until.is_some() {
            chart.range.until = self.until;
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitals")
            .join("config.toml")
    }

    /// The explicit path if given, otherwise the default one.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit.map(Path::to_path_buf).unwrap_or_else(Self::path)
    }

    /// Load config from file, or return default if not found or invalid
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to file, creating its directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Engine settings, with an explicit offset taking precedence.
    pub fn engine(&self, offset: Option<ReportingOffset>) -> EngineConfig {
        EngineConfig::new(offset.or(self.reporting_offset).unwrap_or_default())
    }

    /// Names of charts defined only in this file (not presets).
    pub fn custom_chart_names(&self) -> Vec<&str> {
        self.charts
            .iter()
            .filter(|(name, chart)| {
                !PRESET_NAMES.contains(&name.as_str()) && chart.metrics.is_some()
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Resolve output format: explicit flag, then config, then text.
pub fn resolve_format(format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if let Some(format) = format {
        return format;
    }
    match config.format.as_deref() {
        Some(name) => OutputFormat::from_str(name, true).unwrap_or_else(|_| {
            warn!("Ignoring unknown output format '{}' in config", name);
            OutputFormat::default()
        }),
        None => OutputFormat::default(),
    }
}

/// Build the chart called `name`: a preset (with any config override
/// applied) or a chart defined in the config file.
///
/// The `blood_markers` preset takes its columns from the markers present in
/// `records`.
pub fn resolve_chart(name: &str, config: &Config, records: &[RawRecord]) -> Result<ChartConfig> {
    let preset = match name {
        "blood_markers" => Some(ChartConfig::blood_markers_in(records)),
        other => ChartConfig::preset(other),
    };
    let configured = config.charts.get(name);

    let mut chart = match (preset, configured) {
        (Some(chart), _) => chart,
        (None, Some(over)) if over.metrics.is_some() => {
            ChartConfig::new(name, PointBudget::default().raw())
        }
        (None, Some(_)) => bail!(
            "Chart '{}' in config has no metrics and is not a preset",
            name
        ),
        (None, None) => bail!(
            "Unknown chart '{}'. Run 'vitals charts' to list available charts.",
            name
        ),
    };
    if let Some(over) = configured {
        over.apply(&mut chart);
    }
    Ok(chart)
}
