//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! counting and I/O code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{Jurisdiction, LabelSet};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "paylag",
    version,
    about = "Approval-to-payment lag: calendar and business days per ledger row"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Process a ledger file: derive day counts, print the table, optionally export.
    Run(RunArgs),
    /// List the holiday calendar that would be used.
    Holidays(CalendarArgs),
    /// Count days between two `YYYYMMDD` dates.
    Count(CountArgs),
}

/// Holiday calendar options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct CalendarArgs {
    /// Year(s) whose holidays are loaded (repeatable). Defaults to
    /// `PAYLAG_HOLIDAY_YEAR`, else 2024.
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,

    /// Built-in holiday rules.
    #[arg(long, value_enum, default_value_t = Jurisdiction::Kr)]
    pub jurisdiction: Jurisdiction,

    /// Extra holidays: JSON array of dates or CSV with a `date` column.
    /// Defaults to `PAYLAG_HOLIDAYS_FILE` when set.
    #[arg(long, value_name = "FILE")]
    pub holidays_file: Option<PathBuf>,
}

/// Options for `paylag run`.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Ledger file (.csv, .xlsx, .xls, .ods). Prompts when omitted.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub calendar: CalendarArgs,

    /// Export enriched rows to CSV (UTF-8 with BOM).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export enriched rows to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Column label language.
    #[arg(long, value_enum, default_value_t = LabelSet::Ko)]
    pub labels: LabelSet,

    /// Rows shown in the terminal table (0 = all).
    #[arg(long, default_value_t = 50)]
    pub top: usize,
}

/// Options for `paylag count`.
#[derive(Debug, Args, Clone)]
pub struct CountArgs {
    /// Start date (`YYYYMMDD`).
    pub start: String,

    /// End date (`YYYYMMDD`).
    pub end: String,

    #[command(flatten)]
    pub calendar: CalendarArgs,
}
