//! Labels command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use time::{Date, Duration};
use vitals_core::{LabelTier, format_labels, format_tooltip_label};
use vitals_types::date::serde_date;

use crate::cli::OutputFormat;
use crate::format::{FormatOptions, format_labels_csv, format_labels_text};
use crate::util::write_output;

/// Arguments for the labels command.
pub struct LabelArgs<'a> {
    pub start: Date,
    pub days: u16,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

/// Axis labels for a run of consecutive dates.
#[derive(Debug, Clone, Serialize)]
pub struct LabelPreview {
    pub tier: LabelTier,
    pub rows: Vec<LabelRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelRow {
    #[serde(with = "serde_date")]
    pub date: Date,
    pub label: String,
    pub tooltip: String,
}

impl LabelPreview {
    /// Labels for `days` consecutive dates starting at `start`.
    pub fn consecutive(start: Date, days: u16) -> Result<Self> {
        let dates = (0..i64::from(days))
            .map(|offset| {
                start
                    .checked_add(Duration::days(offset))
                    .with_context(|| format!("{} days from {} is out of range", days, start))
            })
            .collect::<Result<Vec<Date>>>()?;

        let rows = format_labels(&dates)
            .into_iter()
            .zip(&dates)
            .map(|(label, date)| LabelRow {
                date: *date,
                label,
                tooltip: format_tooltip_label(*date),
            })
            .collect();

        Ok(Self {
            tier: LabelTier::for_len(dates.len()),
            rows,
        })
    }
}

pub fn cmd_labels(args: LabelArgs<'_>) -> Result<()> {
    let LabelArgs {
        start,
        days,
        format,
        output,
        opts,
    } = args;

    let preview = LabelPreview::consecutive(start, days)?;

    let content = match format {
        OutputFormat::Json => opts.as_json(&preview)?,
        OutputFormat::Csv => format_labels_csv(&preview, opts)?,
        OutputFormat::Text => format_labels_text(&preview, opts),
    };

    write_output(output, &content)
}
