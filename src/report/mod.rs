//! Reporting utilities: run summary and terminal formatting.

pub mod format;

pub use format::*;

use std::path::PathBuf;

use crate::domain::EnrichedRecord;
use crate::io::ingest::IngestedData;

/// Aggregate counts describing one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub source: PathBuf,
    pub holiday_calendar: String,
    pub rows_read: usize,
    pub records: usize,
    pub skipped_rows: usize,
    pub missing_request_date: usize,
    pub missing_cause_action_date: usize,
    pub missing_payment_date: usize,
    /// Mean of the defined business-day counts, if any are defined.
    pub mean_business_days: Option<f64>,
    pub max_business_days: Option<i64>,
}

/// Summarize ingest counts and the enriched records.
pub fn summarize(ingest: &IngestedData, records: &[EnrichedRecord], holiday_calendar: String) -> RunSummary {
    let count_missing = |f: fn(&EnrichedRecord) -> bool| records.iter().filter(|r| f(r)).count();

    let business: Vec<i64> = records
        .iter()
        .filter_map(|r| r.metrics.business_days_request_to_payment.value())
        .collect();
    let mean_business_days = if business.is_empty() {
        None
    } else {
        Some(business.iter().sum::<i64>() as f64 / business.len() as f64)
    };

    RunSummary {
        source: ingest.source.clone(),
        holiday_calendar,
        rows_read: ingest.rows_read,
        records: records.len(),
        skipped_rows: ingest.row_errors.len(),
        missing_request_date: count_missing(|r| r.record.request_date.is_missing()),
        missing_cause_action_date: count_missing(|r| r.record.cause_action_date.is_missing()),
        missing_payment_date: count_missing(|r| r.record.payment_date.is_missing()),
        mean_business_days,
        max_business_days: business.iter().copied().max(),
    }
}
