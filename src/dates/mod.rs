//! Source date normalization.
//!
//! Raw spreadsheet cells arrive as text; this module turns them into
//! `DateField`s without ever failing the surrounding record.

pub mod normalize;

pub use normalize::*;
