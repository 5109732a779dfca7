//! Chart command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use time::Date;
use tracing::info;
use vitals_core::build_chart;
use vitals_types::ReportingOffset;

use crate::cli::OutputFormat;
use crate::config::{Config, resolve_chart};
use crate::format::{FormatOptions, format_chart_csv, format_chart_text};
use crate::util::{read_records, report_skipped, write_output};

/// Arguments for the chart command.
pub struct ChartArgs<'a> {
    pub input: &'a PathBuf,
    pub chart: &'a str,
    pub max_points: Option<i64>,
    pub since: Option<Date>,
    pub until: Option<Date>,
    pub offset: Option<ReportingOffset>,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub config: &'a Config,
    pub opts: &'a FormatOptions,
}

pub fn cmd_chart(args: ChartArgs<'_>) -> Result<()> {
    let ChartArgs {
        input,
        chart,
        max_points,
        since,
        until,
        offset,
        format,
        output,
        quiet,
        config,
        opts,
    } = args;

    let records = read_records(input)?;

    let mut chart_config = resolve_chart(chart, config, &records)?;
    if let Some(max_points) = max_points {
        chart_config = chart_config.with_max_points(max_points);
    }
    if since.is_some() {
        chart_config.range.since = since;
    }
    if until.is_some() {
        chart_config.range.until = until;
    }
    chart_config
        .validate()
        .with_context(|| format!("Chart '{}' cannot be built", chart))?;

    let engine = config.engine(offset);
    let data = build_chart(&records, &chart_config, &engine);

    report_skipped(&data.skipped, data.out_of_range);
    if !quiet && data.is_downsampled() {
        info!(
            "Downsampled {} days to {} points",
            data.original_len,
            data.len()
        );
    }

    let content = match format {
        OutputFormat::Json => opts.as_json(&data)?,
        OutputFormat::Csv => format_chart_csv(&data, opts)?,
        OutputFormat::Text => format_chart_text(&data, opts),
    };

    write_output(output, &content)
}
