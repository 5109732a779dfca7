//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use time::Date;
use vitals_types::{Metric, Reduction, ReportingOffset};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Standard styling with colors
    Minimal,
    /// Rounded tables and colored headings (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the config file setting, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

/// Reusable record input arguments
#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// JSON file holding an array of records
    pub input: PathBuf,

    /// Keep dates on or after this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub since: Option<Date>,

    /// Keep dates on or before this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub until: Option<Date>,

    /// UTC offset used to turn timestamps into dates (UTC, +02:00, -05:30)
    #[arg(long, env = "VITALS_OFFSET")]
    pub offset: Option<ReportingOffset>,
}

#[derive(Parser)]
#[command(name = "vitals")]
#[command(author, version, about = "Daily charts from personal health records", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (minimal, rich, plain)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "rich",
        env = "VITALS_STYLE"
    )]
    pub style: StyleMode,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "VITALS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a downsampled, labelled chart from a record export
    Chart {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Chart preset or configured chart name (see `vitals charts`)
        #[arg(short, long)]
        chart: String,

        /// Maximum number of plotted points (0 or less keeps only the endpoints)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        max_points: Option<i64>,
    },

    /// Print the daily buckets of one or more metrics, before downsampling
    Buckets {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Metric to aggregate (repeatable): heart_rate, calories, protein, blood:ldl, ...
        #[arg(short, long = "metric", required = true)]
        metrics: Vec<Metric>,

        /// Reduction for every metric (defaults to each metric's own)
        #[arg(short, long)]
        reduction: Option<Reduction>,
    },

    /// Preview axis labels and tooltips for a run of consecutive days
    Labels {
        #[command(flatten)]
        output: OutputArgs,

        /// First day of the run (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        start: Date,

        /// Number of consecutive days
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        days: u16,
    },

    /// List chart presets and configured charts
    Charts {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init,
}

/// Parse a `YYYY-MM-DD` argument.
fn parse_date_arg(s: &str) -> Result<Date, String> {
    vitals_types::parse_date(s).map_err(|e| e.to_string())
}
