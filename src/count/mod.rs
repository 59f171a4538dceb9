//! Day counting over normalized records.
//!
//! Responsibilities:
//!
//! - business days in an inclusive range, given a holiday calendar
//! - signed calendar-day differences
//! - per-record derived metrics and the ordering handed to reporters

pub mod counter;

pub use counter::*;
