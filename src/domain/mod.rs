//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized date and metric states (`DateField`, `Metric`)
//! - raw and normalized records (`RawRecord`, `ApprovalRecord`)
//! - computed outputs (`DerivedMetrics`, `EnrichedRecord`)
//! - run configuration (`RunConfig`, `CalendarConfig`)

pub mod types;

pub use types::*;
