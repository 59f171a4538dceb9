//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and `.env`
//! - builds the holiday calendar
//! - runs the ledger pipeline
//! - prints the report
//! - writes optional exports

use std::path::PathBuf;

use chrono::Datelike;
use clap::Parser;
use tracing::debug;

use crate::calendar::{HolidayProvider, build_calendar};
use crate::cli::{CalendarArgs, Command, CountArgs, RunArgs};
use crate::count::{business_day_count, calendar_days};
use crate::dates::normalize;
use crate::domain::{CalendarConfig, RunConfig};
use crate::error::AppError;
use crate::logging::{LogConfig, init_logging};

pub mod pipeline;

/// Holiday year used when neither `--year` nor `PAYLAG_HOLIDAY_YEAR` is given.
pub const DEFAULT_HOLIDAY_YEAR: i32 = 2024;

const ENV_HOLIDAY_YEAR: &str = "PAYLAG_HOLIDAY_YEAR";
const ENV_HOLIDAYS_FILE: &str = "PAYLAG_HOLIDAYS_FILE";

/// Entry point for the `paylag` binary.
pub fn run() -> Result<(), AppError> {
    // `paylag` and `paylag ledger.xlsx` behave like `paylag run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // `.env` first so a `RUST_LOG` set there reaches the subscriber.
    dotenvy::dotenv().ok();
    init_logging(&log_config(cli.verbose, std::env::var("RUST_LOG").ok()));

    match cli.command {
        Command::Run(args) => handle_run(&args),
        Command::Holidays(args) => handle_holidays(&args),
        Command::Count(args) => handle_count(&args),
    }
}

fn handle_run(args: &RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(args)?;
    let run = pipeline::run_pipeline(&config)?;

    println!("{}", crate::report::format_run_summary(&run.summary));
    println!(
        "{}",
        crate::report::format_records_table(&run.records, config.labels, config.top_n)
    );

    if let Some(path) = &config.export_csv {
        crate::io::export::write_results_csv(path, &run.records, config.labels)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &config.export_json {
        crate::io::json::write_results_json(path, &config.input_path, run.calendar.name(), &run.records)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_holidays(args: &CalendarArgs) -> Result<(), AppError> {
    let calendar = build_calendar(&calendar_config_from_env(args)?)?;

    println!("Holiday calendar: {} ({} dates)", calendar.name(), calendar.len());
    for date in calendar.iter() {
        println!("{} {}", date.format("%Y-%m-%d"), date.weekday());
    }
    Ok(())
}

fn handle_count(args: &CountArgs) -> Result<(), AppError> {
    let start = normalize(&args.start);
    let end = normalize(&args.end);
    for (name, raw, parsed) in [("start", &args.start, start), ("end", &args.end, end)] {
        if parsed.is_missing() {
            return Err(AppError::input(format!("Invalid {name} date '{raw}'. Expected YYYYMMDD.")));
        }
    }

    let calendar = build_calendar(&calendar_config_from_env(&args.calendar)?)?;
    let business = business_day_count(start, end, &calendar);
    let calendar_diff = calendar_days(start, end);

    println!("Holiday calendar: {}", calendar.name());
    println!(
        "business_days={} calendar_days={}",
        crate::io::export::fmt_metric(business),
        crate::io::export::fmt_metric(calendar_diff)
    );
    Ok(())
}

/// `-v` count plus optional `RUST_LOG` directives (which win when non-empty).
pub fn log_config(verbosity: u8, rust_log: Option<String>) -> LogConfig {
    LogConfig {
        directives: rust_log.filter(|s| !s.trim().is_empty()),
        ..LogConfig::from_verbosity(verbosity)
    }
}

/// Resolve the run configuration from CLI flags (plus environment defaults).
pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig, AppError> {
    let input_path = match &args.file {
        Some(path) => crate::cli::picker::validate_input_path(path)?,
        None => crate::cli::picker::prompt_for_input_path()?,
    };

    Ok(RunConfig {
        input_path,
        calendar: calendar_config_from_env(&args.calendar)?,
        labels: args.labels,
        top_n: args.top,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

fn calendar_config_from_env(args: &CalendarArgs) -> Result<CalendarConfig, AppError> {
    calendar_config(
        args,
        std::env::var(ENV_HOLIDAY_YEAR).ok(),
        std::env::var(ENV_HOLIDAYS_FILE).ok(),
    )
}

/// Flags win over environment values; environment wins over defaults.
pub fn calendar_config(
    args: &CalendarArgs,
    env_year: Option<String>,
    env_holidays_file: Option<String>,
) -> Result<CalendarConfig, AppError> {
    let years = if !args.years.is_empty() {
        args.years.clone()
    } else if let Some(raw) = env_year.filter(|s| !s.trim().is_empty()) {
        parse_env_years(&raw)?
    } else {
        vec![DEFAULT_HOLIDAY_YEAR]
    };

    let holidays_file = args
        .holidays_file
        .clone()
        .or_else(|| env_holidays_file.filter(|s| !s.trim().is_empty()).map(PathBuf::from));

    debug!(?years, ?holidays_file, jurisdiction = ?args.jurisdiction, "calendar config resolved");

    Ok(CalendarConfig {
        jurisdiction: args.jurisdiction,
        years,
        holidays_file,
    })
}

/// `PAYLAG_HOLIDAY_YEAR` accepts one year or a comma-separated list.
fn parse_env_years(raw: &str) -> Result<Vec<i32>, AppError> {
    raw.split(',')
        .map(|part| {
            part.trim().parse::<i32>().map_err(|_| {
                AppError::input(format!("Invalid {ENV_HOLIDAY_YEAR} value '{raw}'. Expected e.g. 2024 or 2024,2025."))
            })
        })
        .collect()
}

/// Rewrite argv so `paylag` defaults to `paylag run`.
///
/// Rules:
/// - `paylag`                         -> `paylag run`
/// - `paylag ledger.xlsx ...`         -> `paylag run ledger.xlsx ...`
/// - `paylag -v ...`                  -> `paylag run -v ...`
/// - `paylag --help/--version/-h/-V`  -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "holidays" | "count");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "run".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_run() {
        assert_eq!(rewrite_args(argv(&["paylag"])), argv(&["paylag", "run"]));
        assert_eq!(
            rewrite_args(argv(&["paylag", "ledger.xlsx"])),
            argv(&["paylag", "run", "ledger.xlsx"])
        );
        assert_eq!(
            rewrite_args(argv(&["paylag", "-v", "ledger.csv"])),
            argv(&["paylag", "run", "-v", "ledger.csv"])
        );
        assert_eq!(rewrite_args(argv(&["paylag", "--help"])), argv(&["paylag", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["paylag", "count", "20240101", "20240102"])),
            argv(&["paylag", "count", "20240101", "20240102"])
        );
    }

    #[test]
    fn calendar_config_precedence() {
        let mut args = CalendarArgs::default();

        let cfg = calendar_config(&args, None, None).unwrap();
        assert_eq!(cfg.years, vec![DEFAULT_HOLIDAY_YEAR]);
        assert_eq!(cfg.holidays_file, None);

        let cfg = calendar_config(&args, Some("2023, 2024".to_string()), Some("h.json".to_string())).unwrap();
        assert_eq!(cfg.years, vec![2023, 2024]);
        assert_eq!(cfg.holidays_file, Some(PathBuf::from("h.json")));

        args.years = vec![2025];
        args.holidays_file = Some(PathBuf::from("flag.csv"));
        let cfg = calendar_config(&args, Some("2023".to_string()), Some("h.json".to_string())).unwrap();
        assert_eq!(cfg.years, vec![2025]);
        assert_eq!(cfg.holidays_file, Some(PathBuf::from("flag.csv")));
    }

    #[test]
    fn rust_log_from_env_wins_over_verbosity() {
        let cfg = log_config(0, Some("payment_lag=debug".to_string()));
        assert_eq!(cfg.directives.as_deref(), Some("payment_lag=debug"));

        let cfg = log_config(2, Some(String::new()));
        assert_eq!(cfg.directives, None);
        assert_eq!(cfg.level, tracing::Level::DEBUG);
    }

    #[test]
    fn bad_env_year_is_an_input_error() {
        let err = calendar_config(&CalendarArgs::default(), Some("twenty".to_string()), None).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
