//! Utility functions for CLI operations.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use vitals_core::SkipReport;
use vitals_types::RawRecord;

/// Read a JSON array of records from a file.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records from {}", path.display()))?;
    let records: Vec<RawRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records in {}", path.display()))?;
    debug!(path = %path.display(), records = records.len(), "Loaded records");
    Ok(records)
}

/// Log records that were left out of an aggregation.
pub fn report_skipped(skipped: &SkipReport, out_of_range: usize) {
    if skipped.total() > 0 {
        warn!(
            missing_date = skipped.missing_date,
            unparseable_date = skipped.unparseable_date,
            "Skipped {} record(s) without a usable date",
            skipped.total()
        );
    }
    if out_of_range > 0 {
        debug!(out_of_range, "Records outside the date range");
    }
}

/// Write output to file or stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}
