//! Business-day and calendar-day counting.
//!
//! Every function here is total: missing inputs propagate as `Metric::Undefined`
//! and an inverted range counts zero business days.

use chrono::{Datelike, NaiveDate, Weekday};
use rayon::prelude::*;

use crate::calendar::HolidayProvider;
use crate::domain::{ApprovalRecord, DateField, DerivedMetrics, EnrichedRecord, Metric};

/// Monday-Friday and not a registered holiday.
pub fn is_business_day<H: HolidayProvider + ?Sized>(date: NaiveDate, holidays: &H) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(date)
}

/// Count business days in `[start, end]`, both ends included.
///
/// Days are walked forward from `start`; if `start > end` nothing is visited
/// and the count is 0. The endpoints are not swapped.
pub fn business_day_count<H: HolidayProvider + ?Sized>(start: DateField, end: DateField, holidays: &H) -> Metric {
    let (Some(start), Some(end)) = (start.date(), end.date()) else {
        return Metric::Undefined;
    };
    let count = start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d, holidays))
        .count();
    Metric::Value(count as i64)
}

/// Signed `end - start` in calendar days.
pub fn calendar_days(start: DateField, end: DateField) -> Metric {
    match (start.date(), end.date()) {
        (Some(start), Some(end)) => Metric::Value((end - start).num_days()),
        _ => Metric::Undefined,
    }
}

/// Compute the three derived metrics for one record.
pub fn derive_metrics<H: HolidayProvider + ?Sized>(record: &ApprovalRecord, holidays: &H) -> DerivedMetrics {
    DerivedMetrics {
        calendar_days_cause_to_payment: calendar_days(record.cause_action_date, record.payment_date),
        calendar_days_request_to_payment: calendar_days(record.request_date, record.payment_date),
        business_days_request_to_payment: business_day_count(
            record.request_date,
            record.payment_date,
            holidays,
        ),
    }
}

/// Map records to enriched records (parallel, input order preserved).
pub fn enrich<H: HolidayProvider + ?Sized>(records: Vec<ApprovalRecord>, holidays: &H) -> Vec<EnrichedRecord> {
    records
        .into_par_iter()
        .map(|record| {
            let metrics = derive_metrics(&record, holidays);
            EnrichedRecord { record, metrics }
        })
        .collect()
}

/// Stable ascending sort by payment date; missing payment dates go last.
pub fn sort_by_payment_date(records: &mut [EnrichedRecord]) {
    records.sort_by_key(|r| match r.record.payment_date {
        DateField::Present(d) => (false, Some(d)),
        DateField::Missing => (true, None),
    });
}
