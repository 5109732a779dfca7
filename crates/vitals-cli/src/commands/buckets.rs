//! Buckets command implementation.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use time::Date;
use vitals_core::{Aggregation, DateRange, MetricSpec, SkipReport, aggregate_within};
use vitals_types::date::serde_date;
use vitals_types::{Metric, Reduction, ReportingOffset};

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::format::{FormatOptions, format_buckets_csv, format_buckets_text};
use crate::util::{read_records, report_skipped, write_output};

/// Arguments for the buckets command.
pub struct BucketArgs<'a> {
    pub input: &'a PathBuf,
    pub metrics: &'a [Metric],
    pub reduction: Option<Reduction>,
    pub since: Option<Date>,
    pub until: Option<Date>,
    pub offset: Option<ReportingOffset>,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub config: &'a Config,
    pub opts: &'a FormatOptions,
}

/// Daily buckets before downsampling.
#[derive(Debug, Clone, Serialize)]
pub struct BucketReport {
    /// Column names, in the order given on the command line.
    pub metrics: Vec<String>,
    pub days: Vec<BucketDay>,
    pub skipped: SkipReport,
    pub out_of_range: usize,
}

/// One calendar date.
#[derive(Debug, Clone, Serialize)]
pub struct BucketDay {
    #[serde(with = "serde_date")]
    pub date: Date,
    pub values: Vec<BucketCell>,
}

/// One metric on one date.
#[derive(Debug, Clone, Serialize)]
pub struct BucketCell {
    pub metric: String,
    pub reduction: Reduction,
    pub value: Option<f64>,
    pub count: usize,
}

impl From<&Aggregation> for BucketReport {
    fn from(aggregation: &Aggregation) -> Self {
        let days = aggregation
            .buckets
            .iter()
            .map(|(date, bucket)| BucketDay {
                date: *date,
                values: bucket
                    .iter()
                    .map(|(name, acc)| BucketCell {
                        metric: name.to_string(),
                        reduction: acc.reduction(),
                        value: acc.value(),
                        count: acc.count(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            metrics: aggregation
                .specs()
                .iter()
                .map(|spec| spec.name.clone())
                .collect(),
            days,
            skipped: aggregation.skipped,
            out_of_range: aggregation.out_of_range,
        }
    }
}

pub fn cmd_buckets(args: BucketArgs<'_>) -> Result<()> {
    let BucketArgs {
        input,
        metrics,
        reduction,
        since,
        until,
        offset,
        format,
        output,
        config,
        opts,
    } = args;

    let records = read_records(input)?;

    let specs: Vec<MetricSpec> = metrics
        .iter()
        .map(|metric| match reduction {
            Some(reduction) => MetricSpec::with_reduction(metric.clone(), reduction),
            None => MetricSpec::new(metric.clone()),
        })
        .collect();
    let range = DateRange { since, until };

    let aggregation = aggregate_within(&records, &specs, config.engine(offset).zone(), &range);
    report_skipped(&aggregation.skipped, aggregation.out_of_range);
    let report = BucketReport::from(&aggregation);

    let content = match format {
        OutputFormat::Json => opts.as_json(&report)?,
        OutputFormat::Csv => format_buckets_csv(&report, opts)?,
        OutputFormat::Text => format_buckets_text(&report, opts),
    };

    write_output(output, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StyleMode;
    use std::fs;

    const RECORDS: &str = r#"[
        {"date": "2025-01-01", "type": "activity", "sport": "Run", "average_heartrate": 150},
        {"date": "2025-01-02", "type": "activity", "sport": "Run", "average_heartrate": 150},
        {"date": "2025-01-02", "type": "activity", "sport": "Run", "average_heartrate": 130},
        {"date": "2025-01-02", "type": "activity", "sport": "Run", "average_heartrate": 150},
        {"date": "2025-01-02", "type": "nutrition", "calories": 2100},
        {"date": "someday", "type": "nutrition", "calories": 400}
    ]"#;

    fn run(metrics: &[Metric], reduction: Option<Reduction>, format: OutputFormat) -> String {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("records.json");
        let out = dir.path().join("out");
        fs::write(&input, RECORDS).unwrap();

        let opts = FormatOptions::new(true, StyleMode::Plain);
        cmd_buckets(BucketArgs {
            input: &input,
            metrics,
            reduction,
            since: None,
            until: None,
            offset: None,
            format,
            output: Some(&out),
            config: &Config::default(),
            opts: &opts,
        })
        .unwrap();
        fs::read_to_string(out).unwrap()
    }

    #[test]
    fn test_buckets_json() {
        let json = run(
            &[Metric::HeartRate, Metric::CaloriesConsumed],
            None,
            OutputFormat::Json,
        );
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metrics"][0], "heart_rate");
        assert_eq!(value["metrics"][1], "calories_consumed");
        assert_eq!(value["days"][0]["date"], "2025-01-01");
        assert_eq!(value["days"][1]["values"][0]["count"], 3);
        assert_eq!(value["days"][1]["values"][0]["reduction"], "mean");
        assert_eq!(value["days"][1]["values"][1]["value"], 2100.0);
        assert_eq!(value["skipped"]["unparseable_date"], 1);

        let mean = value["days"][1]["values"][0]["value"].as_f64().unwrap();
        assert!((mean - 143.333_333).abs() < 1e-4);
    }

    #[test]
    fn test_reduction_override() {
        let csv = run(&[Metric::HeartRate], Some(Reduction::Sum), OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,heart_rate,heart_rate_count");
        assert_eq!(lines[1], "2025-01-01,150,1");
        assert_eq!(lines[2], "2025-01-02,430,3");
    }

    #[test]
    fn test_buckets_text() {
        let text = run(&[Metric::HeartRate], None, OutputFormat::Text);

        assert!(text.contains("Daily buckets (2 days)"));
        assert!(text.contains("143.3 (3)"));
        assert!(text.contains("1 with an unreadable date"));
    }
}
