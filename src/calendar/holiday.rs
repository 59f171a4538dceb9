//! The run's holiday set.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

/// A queryable set of non-business dates.
pub trait HolidayProvider: std::fmt::Debug + Send + Sync {
    /// Human-readable description (e.g. `"South Korea 2024"`).
    fn name(&self) -> String;

    /// Return `true` if `date` is a registered holiday.
    fn contains(&self, date: NaiveDate) -> bool;
}

/// Immutable holiday calendar for one jurisdiction and a fixed set of years.
///
/// Built once at the start of a run and shared by reference. Dates outside the
/// configured years simply have no holidays registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    jurisdiction: String,
    years: Vec<i32>,
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new(
        jurisdiction: impl Into<String>,
        years: impl IntoIterator<Item = i32>,
        dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        let mut years: Vec<i32> = years.into_iter().collect();
        years.sort_unstable();
        years.dedup();
        Self {
            jurisdiction: jurisdiction.into(),
            years,
            dates: dates.into_iter().collect(),
        }
    }

    /// A calendar with no holidays (weekends are still non-business days).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Holidays in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }

    /// Whether `date` falls in one of the years the calendar was built for.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.years.binary_search(&date.year()).is_ok()
    }

    /// Return a new calendar with `extra` dates added.
    pub fn with_extra_dates(mut self, extra: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.dates.extend(extra);
        self
    }
}

impl HolidayProvider for HolidayCalendar {
    fn name(&self) -> String {
        let jurisdiction = if self.jurisdiction.is_empty() {
            "custom"
        } else {
            self.jurisdiction.as_str()
        };
        if self.years.is_empty() {
            return jurisdiction.to_string();
        }
        let years: Vec<String> = self.years.iter().map(i32::to_string).collect();
        format!("{jurisdiction} {}", years.join(","))
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }
}
