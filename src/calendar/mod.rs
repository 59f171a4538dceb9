//! Holiday calendars.
//!
//! - `HolidayProvider` / `HolidayCalendar`: the immutable set the counter queries (`holiday`)
//! - built-in South Korea rules (`korea`)
//! - user-supplied holiday lists (`file`)

pub mod file;
pub mod holiday;
pub mod korea;

pub use file::*;
pub use holiday::*;
pub use korea::*;

use tracing::{info, warn};

use crate::domain::{CalendarConfig, Jurisdiction};
use crate::error::AppError;

/// Build the run's holiday calendar from configuration.
///
/// Called once per run; the result is shared read-only by every record.
pub fn build_calendar(config: &CalendarConfig) -> Result<HolidayCalendar, AppError> {
    let mut dates = Vec::new();

    if config.jurisdiction == Jurisdiction::Kr {
        for &year in &config.years {
            if !has_lunar_table(year) {
                warn!(year, "no lunar holiday table for year; only fixed-date holidays are loaded");
            }
            dates.extend(korea_holidays(year));
        }
    }

    let mut calendar = HolidayCalendar::new(
        config.jurisdiction.display_name(),
        config.years.iter().copied(),
        dates,
    );

    if let Some(path) = &config.holidays_file {
        calendar = calendar.with_extra_dates(load_holiday_file(path)?);
    }

    info!(
        calendar = %calendar.name(),
        holidays = calendar.len(),
        "holiday calendar ready"
    );
    Ok(calendar)
}
