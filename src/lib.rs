//! `payment-lag` library crate.
//!
//! The binary (`paylag`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the date normalizer and business-day counter are reusable on their own

pub mod app;
pub mod calendar;
pub mod cli;
pub mod count;
pub mod dates;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
