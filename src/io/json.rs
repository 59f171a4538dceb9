//! Write enriched records as JSON.
//!
//! The JSON export is the machine-readable counterpart of the CSV export:
//! - one object per record, in report order
//! - dates as `YYYY-MM-DD`; missing dates and undefined metrics as `null`
//! - a small header naming the source file and the holiday calendar used

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::EnrichedRecord;
use crate::error::AppError;

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct ResultsFile<'a> {
    pub tool: &'static str,
    pub source: PathBuf,
    pub holiday_calendar: String,
    pub records: &'a [EnrichedRecord],
}

/// Write a results JSON file.
pub fn write_results_json(
    path: &Path,
    source: &Path,
    holiday_calendar: String,
    records: &[EnrichedRecord],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create results JSON '{}': {e}", path.display())))?;

    let doc = ResultsFile {
        tool: "paylag",
        source: source.to_path_buf(),
        holiday_calendar,
        records,
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::output(format!("Failed to write results JSON: {e}")))?;

    info!(path = %path.display(), rows = records.len(), "wrote JSON export");
    Ok(())
}
