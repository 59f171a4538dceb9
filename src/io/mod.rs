//! Input/output helpers.
//!
//! - CSV/spreadsheet ingest (`ingest`)
//! - CSV export (`export`)
//! - JSON export (`json`)

pub mod export;
pub mod ingest;
pub mod json;

pub use export::*;
pub use ingest::*;
pub use json::*;
