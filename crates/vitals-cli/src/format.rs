//! Output formatting utilities for text, JSON, and CSV output.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tabled::builder::Builder;
use vitals_core::{ChartData, SkipReport};

use crate::cli::StyleMode;
use crate::commands::{BucketReport, ChartEntry, LabelPreview};
use crate::style;

/// Formatting options for output.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Disable colored output.
    pub no_color: bool,
    /// Omit header row in CSV output.
    pub no_header: bool,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
    /// Visual styling mode.
    pub style: StyleMode,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            no_header: false,
            compact: false,
            style: StyleMode::Rich,
        }
    }
}

impl FormatOptions {
    pub fn new(no_color: bool, style: StyleMode) -> Self {
        // Plain mode automatically disables colors for pipe-friendliness
        Self {
            no_color: no_color || style == StyleMode::Plain,
            style,
            ..Self::default()
        }
    }

    /// Create with no_header option for CSV output.
    pub fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    /// Create with compact JSON option.
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Serialize to JSON, pretty or compact depending on options.
    pub fn as_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)
        } else {
            serde_json::to_string_pretty(value)
        }
        .context("Failed to serialize JSON")?;
        Ok(json + "\n")
    }
}

/// Format a value for a text table; gaps show as `-`.
fn text_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{:.0}", v),
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

/// Format a value for CSV; gaps are empty fields.
fn csv_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write rows to a CSV string, with an optional header.
fn write_csv<I>(header: Option<Vec<String>>, rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    if let Some(header) = header {
        writer
            .write_record(&header)
            .context("Failed to write CSV header")?;
    }
    for row in rows {
        writer.write_record(&row).context("Failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Render a table builder with the configured style.
fn render_table(builder: Builder, opts: &FormatOptions) -> String {
    let mut table = builder.build();
    style::apply_table_style(&mut table, opts.style);
    table.to_string()
}

/// One-line summary of skipped and out-of-range records, if any.
fn skip_summary(skipped: &SkipReport, out_of_range: usize) -> Option<String> {
    let mut parts = Vec::new();
    if skipped.missing_date > 0 {
        parts.push(format!("{} without a date", skipped.missing_date));
    }
    if skipped.unparseable_date > 0 {
        parts.push(format!("{} with an unreadable date", skipped.unparseable_date));
    }
    if out_of_range > 0 {
        parts.push(format!("{} outside the date range", out_of_range));
    }
    if parts.is_empty() {
        None
    } else {
        Some(format!("Records left out: {}", parts.join(", ")))
    }
}

// ============================================================================
// Chart output
// ============================================================================

#[must_use]
pub fn format_chart_text(chart: &ChartData, opts: &FormatOptions) -> String {
    let mut output = style::format_title(&format!("Chart: {}", chart.chart), opts.no_color);
    output.push('\n');

    if chart.is_empty() {
        output.push_str("No dated records matched this chart.\n");
    } else {
        let summary = format!(
            "{} points from {} days, {} labels",
            chart.len(),
            chart.original_len,
            chart.tier()
        );
        output.push_str(&style::format_note(&summary, opts.no_color));
        output.push_str("\n\n");

        let mut builder = Builder::default();
        let mut header = vec!["Date".to_string(), "Label".to_string()];
        header.extend(chart.datasets.iter().map(|d| d.name.clone()));
        builder.push_record(header);

        for (i, date) in chart.dates.iter().enumerate() {
            let mut row = vec![date.to_string(), chart.labels[i].clone()];
            row.extend(chart.datasets.iter().map(|d| text_value(d.values[i])));
            builder.push_record(row);
        }

        output.push_str(&render_table(builder, opts));
        output.push('\n');
    }

    if let Some(summary) = skip_summary(&chart.skipped, chart.out_of_range) {
        output.push('\n');
        output.push_str(&style::format_warning(&summary, opts.no_color));
        output.push('\n');
    }
    output
}

pub fn format_chart_csv(chart: &ChartData, opts: &FormatOptions) -> Result<String> {
    let header = (!opts.no_header).then(|| {
        let mut header = vec![
            "date".to_string(),
            "label".to_string(),
            "tooltip".to_string(),
        ];
        header.extend(chart.datasets.iter().map(|d| d.name.clone()));
        header
    });

    let rows = chart.dates.iter().enumerate().map(|(i, date)| {
        let mut row = vec![
            date.to_string(),
            chart.labels[i].clone(),
            chart.tooltips[i].clone(),
        ];
        row.extend(chart.datasets.iter().map(|d| csv_value(d.values[i])));
        row
    });

    write_csv(header, rows)
}

// ============================================================================
// Bucket output
// ============================================================================

#[must_use]
pub fn format_buckets_text(report: &BucketReport, opts: &FormatOptions) -> String {
    let mut output = style::format_title(
        &format!("Daily buckets ({} days)", report.days.len()),
        opts.no_color,
    );
    output.push('\n');

    if report.days.is_empty() {
        output.push_str("No dated records matched these metrics.\n");
    } else {
        output.push('\n');
        let mut builder = Builder::default();
        let mut header = vec!["Date".to_string()];
        header.extend(report.metrics.iter().cloned());
        builder.push_record(header);

        for day in &report.days {
            let mut row = vec![day.date.to_string()];
            row.extend(day.values.iter().map(|cell| {
                if cell.count == 0 {
                    text_value(cell.value)
                } else {
                    format!("{} ({})", text_value(cell.value), cell.count)
                }
            }));
            builder.push_record(row);
        }

        output.push_str(&render_table(builder, opts));
        output.push('\n');
        output.push_str(&style::format_note(
            "Counts in parentheses are contributing records.",
            opts.no_color,
        ));
        output.push('\n');
    }

    if let Some(summary) = skip_summary(&report.skipped, report.out_of_range) {
        output.push('\n');
        output.push_str(&style::format_warning(&summary, opts.no_color));
        output.push('\n');
    }
    output
}

pub fn format_buckets_csv(report: &BucketReport, opts: &FormatOptions) -> Result<String> {
    let header = (!opts.no_header).then(|| {
        let mut header = vec!["date".to_string()];
        for name in &report.metrics {
            header.push(name.clone());
            header.push(format!("{}_count", name));
        }
        header
    });

    let rows = report.days.iter().map(|day| {
        let mut row = vec![day.date.to_string()];
        for cell in &day.values {
            row.push(csv_value(cell.value));
            row.push(cell.count.to_string());
        }
        row
    });

    write_csv(header, rows)
}

// ============================================================================
// Label preview output
// ============================================================================

#[must_use]
pub fn format_labels_text(preview: &LabelPreview, opts: &FormatOptions) -> String {
    let mut output = style::format_title(
        &format!("Labels for {} days ({})", preview.rows.len(), preview.tier),
        opts.no_color,
    );
    output.push_str("\n\n");

    let mut builder = Builder::default();
    builder.push_record(["Date", "Label", "Tooltip"]);
    for row in &preview.rows {
        builder.push_record([row.date.to_string(), row.label.clone(), row.tooltip.clone()]);
    }
    output.push_str(&render_table(builder, opts));
    output.push('\n');
    output
}

pub fn format_labels_csv(preview: &LabelPreview, opts: &FormatOptions) -> Result<String> {
    let header = (!opts.no_header)
        .then(|| vec!["date".to_string(), "label".to_string(), "tooltip".to_string()]);
    let rows = preview
        .rows
        .iter()
        .map(|row| vec![row.date.to_string(), row.label.clone(), row.tooltip.clone()]);
    write_csv(header, rows)
}

// ============================================================================
// Chart listing output
// ============================================================================

#[must_use]
pub fn format_charts_text(entries: &[ChartEntry], opts: &FormatOptions) -> String {
    let mut output = style::format_title("Available charts", opts.no_color);
    output.push_str("\n\n");

    let mut builder = Builder::default();
    builder.push_record(["Name", "Source", "Max points", "Metrics"]);
    for entry in entries {
        builder.push_record([
            entry.name.clone(),
            entry.source.to_string(),
            entry.max_points.to_string(),
            entry.metrics.join(", "),
        ]);
    }
    output.push_str(&render_table(builder, opts));
    output.push('\n');
    output
}

pub fn format_charts_csv(entries: &[ChartEntry], opts: &FormatOptions) -> Result<String> {
    let header = (!opts.no_header).then(|| {
        ["name", "source", "max_points", "metrics"]
            .map(String::from)
            .to_vec()
    });
    let rows = entries.iter().map(|entry| {
        vec![
            entry.name.clone(),
            entry.source.to_string(),
            entry.max_points.to_string(),
            entry.metrics.join(";"),
        ]
    });
    write_csv(header, rows)
}
