//! Command implementations for the CLI.

mod buckets;
mod chart;
mod charts;
mod config;
mod labels;

pub use buckets::{BucketArgs, BucketReport, cmd_buckets};
pub use chart::{ChartArgs, cmd_chart};
pub use charts::{ChartEntry, cmd_charts};
pub use config::cmd_config;
pub use labels::{LabelArgs, LabelPreview, cmd_labels};
