//! Shared run pipeline.
//!
//! ingest -> normalize dates -> derive metrics -> sort by payment date -> summary
//!
//! The CLI handlers only decide what to print and where to export.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::calendar::{HolidayCalendar, HolidayProvider, build_calendar};
use crate::count::{enrich, sort_by_payment_date};
use crate::dates::normalize_record;
use crate::domain::{ApprovalRecord, EnrichedRecord, Jurisdiction, RunConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_records};
use crate::report::{RunSummary, summarize};

/// All computed outputs of a single `paylag run`.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub calendar: HolidayCalendar,
    /// Enriched records, ascending by payment date (missing last).
    pub records: Vec<EnrichedRecord>,
    pub summary: RunSummary,
}

/// Build the calendar from config, then run the pipeline.
pub fn run_pipeline(config: &RunConfig) -> Result<RunOutput, AppError> {
    let calendar = build_calendar(&config.calendar)?;
    run_with_calendar(config, calendar)
}

/// Run the pipeline with an already-built calendar.
pub fn run_with_calendar(config: &RunConfig, calendar: HolidayCalendar) -> Result<RunOutput, AppError> {
    let mut ingest = load_records(&config.input_path)?;

    let normalized: Vec<ApprovalRecord> = std::mem::take(&mut ingest.records)
        .into_iter()
        .map(normalize_record)
        .collect();

    if config.calendar.jurisdiction != Jurisdiction::None {
        warn_uncovered_dates(&normalized, &calendar);
    }

    let mut records = enrich(normalized, &calendar);
    sort_by_payment_date(&mut records);
    info!(records = records.len(), "derived metrics");

    let summary = summarize(&ingest, &records, calendar.name());

    Ok(RunOutput {
        ingest,
        calendar,
        records,
        summary,
    })
}

/// Log how many records have dates outside the calendar years (no holidays apply there).
fn warn_uncovered_dates(records: &[ApprovalRecord], calendar: &HolidayCalendar) {
    let uncovered = records
        .iter()
        .filter(|r| {
            let dates: [Option<NaiveDate>; 2] = [r.request_date.date(), r.payment_date.date()];
            dates.iter().flatten().any(|d| !calendar.covers(*d))
        })
        .count();
    if uncovered > 0 {
        warn!(
            records = uncovered,
            years = ?calendar.years(),
            "request/payment dates outside the holiday calendar years; no holidays applied there"
        );
    }
}
