//! Command-line interface for building daily health charts.
//!
//! The `vitals` binary reads a JSON export of health records (workouts,
//! meals, nights of sleep, lab results), aggregates them per calendar day,
//! downsamples the result to a point budget and prints it with axis labels.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `chart` | Build a downsampled, labelled chart |
//! | `buckets` | Print daily buckets before downsampling |
//! | `labels` | Preview axis labels for a run of days |
//! | `charts` | List chart presets and configured charts |
//! | `config` | Show, locate or initialize the config file |
//!
//! # Output Formats
//!
//! - **Text** (default): tables for reading in a terminal
//! - **JSON**: the full chart, including tooltips and skip counts
//! - **CSV**: one row per date, for spreadsheets
//!
//! # Configuration
//!
//! The CLI reads `~/.config/vitals/config.toml` (or platform equivalent, or
//! the file named by `--config` / `VITALS_CONFIG`). It can set the default
//! output format, the reporting offset, and tune or add charts:
//!
//! ```toml
//! format = "text"
//! reporting_offset = "+01:00"
//!
//! [charts.activity]
//! max_points = 90
//!
//! [charts.recovery]
//! metrics = [{ metric = "hrv" }, { metric = "resting_heart_rate" }]
//! ```
//!
//! # Environment Variables
//!
//! - `VITALS_CONFIG`: config file path
//! - `VITALS_OFFSET`: reporting offset (overridden by `--offset`)
//! - `VITALS_STYLE`: table style (`rich`, `minimal`, `plain`)
//! - `NO_COLOR`: disable colored output when set
//! - `RUST_LOG`: log filter when neither `--verbose` nor `--quiet` is given
//!
//! # Examples
//!
//! Chart a year of workouts in 60 points:
//! ```bash
//! vitals chart export.json --chart activity
//! ```
//!
//! Nutrition for January as CSV:
//! ```bash
//! vitals chart export.json --chart nutrition --since 2025-01-01 --until 2025-01-31 --format csv
//! ```
//!
//! Daily heart-rate means with their record counts:
//! ```bash
//! vitals buckets export.json --metric heart_rate --metric resting_heart_rate
//! ```
//!
//! Preview the label tier for a quarter:
//! ```bash
//! vitals labels --start 2025-01-01 --days 91
//! ```

// This crate is primarily a binary CLI application; dispatch lives in main.rs
// and the subcommands in src/commands/.

// Re-export core dependencies for convenience
pub use vitals_core;
pub use vitals_types;
