//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - produced by ingest and consumed by the counter
//! - exported to CSV/JSON
//! - printed by the terminal report

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Serialize, Serializer};

/// A normalized source date.
///
/// `Missing` is the explicit result of an unparseable or empty cell. It is a
/// distinct state rather than a null so it can never be mistaken for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Present(NaiveDate),
    Missing,
}

impl DateField {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            DateField::Present(d) => Some(d),
            DateField::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, DateField::Missing)
    }
}

impl From<NaiveDate> for DateField {
    fn from(value: NaiveDate) -> Self {
        DateField::Present(value)
    }
}

impl Serialize for DateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateField::Present(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            DateField::Missing => serializer.serialize_none(),
        }
    }
}

/// A derived day count.
///
/// `Undefined` means one of the input dates was `Missing`; it is never folded
/// into zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Value(i64),
    Undefined,
}

impl Metric {
    pub fn value(self) -> Option<i64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Metric::Undefined)
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_i64(*v),
            Metric::Undefined => serializer.serialize_none(),
        }
    }
}

/// Opaque columns carried from input to output unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Passthrough {
    pub amount: String,
    pub preparer: String,
    pub memo: String,
    pub counterparty: String,
}

/// A row as handed over by the tabular source: date cells still as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line (CSV) or row (spreadsheet) number in the source file.
    pub line: usize,
    pub request_date: String,
    pub cause_action_date: String,
    pub payment_date: String,
    pub passthrough: Passthrough,
}

/// A row after date normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalRecord {
    pub line: usize,
    pub request_date: DateField,
    pub cause_action_date: DateField,
    pub payment_date: DateField,
    #[serde(flatten)]
    pub passthrough: Passthrough,
}

/// Per-record computed day counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedMetrics {
    /// `payment_date - cause_action_date` in calendar days (signed).
    pub calendar_days_cause_to_payment: Metric,
    /// `payment_date - request_date` in calendar days (signed).
    pub calendar_days_request_to_payment: Metric,
    /// Business days in `[request_date, payment_date]`, both ends included.
    pub business_days_request_to_payment: Metric,
}

/// An input record plus its derived metrics, ready for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: ApprovalRecord,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

/// Which built-in holiday rules to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Jurisdiction {
    /// South Korea public holidays.
    #[default]
    Kr,
    /// Weekends only; no built-in holidays.
    None,
}

impl Jurisdiction {
    pub fn display_name(self) -> &'static str {
        match self {
            Jurisdiction::Kr => "South Korea",
            Jurisdiction::None => "Weekends only",
        }
    }
}

/// Column label language for exports and the terminal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LabelSet {
    #[default]
    Ko,
    En,
}

impl LabelSet {
    /// Output column headers, in export order.
    pub fn columns(self) -> [&'static str; 10] {
        match self {
            LabelSet::Ko => [
                "품의일자",
                "원인행위일",
                "지급일자",
                "날짜차이(일)",
                "품의일자_지급일자_차이(일)",
                "영업일수(품의~지급)",
                "적요",
                "거래처명",
                "지급액",
                "작성자",
            ],
            LabelSet::En => [
                "request_date",
                "cause_action_date",
                "payment_date",
                "days_cause_to_payment",
                "days_request_to_payment",
                "business_days_request_to_payment",
                "memo",
                "counterparty",
                "amount",
                "preparer",
            ],
        }
    }
}

/// Inputs needed to build the run's holiday calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    pub jurisdiction: Jurisdiction,
    /// Years whose built-in holidays are loaded.
    pub years: Vec<i32>,
    /// Optional user-supplied list of extra holiday dates.
    pub holidays_file: Option<PathBuf>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, `.env`/environment, and defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub calendar: CalendarConfig,
    pub labels: LabelSet,
    /// Rows shown in the terminal table (0 = all).
    pub top_n: usize,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_date_serializes_as_null() {
        let json = serde_json::to_string(&DateField::Missing).unwrap();
        assert_eq!(json, "null");

        let d = DateField::Present(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2024-01-02\"");
    }

    #[test]
    fn enriched_record_flattens_fields() {
        let record = EnrichedRecord {
            record: ApprovalRecord {
                line: 2,
                request_date: DateField::Missing,
                cause_action_date: DateField::Missing,
                payment_date: DateField::Present(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()),
                passthrough: Passthrough {
                    memo: "office supplies".to_string(),
                    ..Passthrough::default()
                },
            },
            metrics: DerivedMetrics {
                calendar_days_cause_to_payment: Metric::Undefined,
                calendar_days_request_to_payment: Metric::Undefined,
                business_days_request_to_payment: Metric::Value(3),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["line"], 2);
        assert!(value["request_date"].is_null());
        assert_eq!(value["payment_date"], "2024-03-04");
        assert_eq!(value["memo"], "office supplies");
        assert!(value["calendar_days_cause_to_payment"].is_null());
        assert_eq!(value["business_days_request_to_payment"], 3);
    }

    #[test]
    fn metric_accessors() {
        assert_eq!(Metric::Value(-9).value(), Some(-9));
        assert!(Metric::Undefined.is_undefined());
        assert!(DateField::Missing.is_missing());
    }
}
