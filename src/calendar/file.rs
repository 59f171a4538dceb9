//! User-supplied holiday lists.
//!
//! Two formats are accepted, chosen by extension:
//! - `.json`: an array of date strings, e.g. `["2024-02-12", "2024-04-10"]`
//! - anything else: CSV with a `date` column
//!
//! Dates may be written `YYYY-MM-DD` or `YYYYMMDD`. Unlike spreadsheet input,
//! a bad date here is an error: the file is a curated list, not bulk data.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use crate::dates::normalize;
use crate::error::AppError;

/// Read a holiday file into a list of dates.
pub fn load_holiday_file(path: &Path) -> Result<Vec<NaiveDate>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open holiday file '{}': {e}", path.display())))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let dates = if is_json {
        let raw: Vec<String> = serde_json::from_reader(file)
            .map_err(|e| AppError::input(format!("Invalid holiday JSON '{}': {e}", path.display())))?;
        raw.iter().map(|s| parse_holiday(s)).collect::<Result<Vec<_>, _>>()?
    } else {
        read_holiday_csv(file, path)?
    };

    debug!(path = %path.display(), count = dates.len(), "loaded holiday file");
    Ok(dates)
}

fn read_holiday_csv(file: File, path: &Path) -> Result<Vec<NaiveDate>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read holiday CSV headers: {e}")))?
        .clone();
    let idx = headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case("date"))
        .ok_or_else(|| AppError::input(format!("Holiday CSV '{}' has no `date` column.", path.display())))?;

    let mut dates = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| AppError::input(format!("Holiday CSV line {}: {e}", row + 2)))?;
        let Some(cell) = record.get(idx).filter(|s| !s.is_empty()) else {
            continue;
        };
        dates.push(parse_holiday(cell)?);
    }
    Ok(dates)
}

fn parse_holiday(s: &str) -> Result<NaiveDate, AppError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| normalize(s).date())
        .ok_or_else(|| {
            AppError::input(format!("Invalid holiday date '{s}'. Expected YYYY-MM-DD or YYYYMMDD."))
        })
}
