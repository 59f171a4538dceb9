//! Tabular input: CSV and spreadsheet files -> `RawRecord`s.
//!
//! This module turns an approval-ledger export into rows of text cells keyed by
//! logical field. It does no date parsing: date cells are handed on as text and
//! normalized later, so a bad cell never drops a row.
//!
//! Design goals:
//! - **Strict schema** for the three date columns (clear errors + exit code 2)
//! - **Row-level tolerance** (unreadable CSV records are reported and skipped)
//! - **Header aliases** so Korean and English exports both load

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, DataType, Reader};
use tracing::{debug, info, warn};

use crate::domain::{Passthrough, RawRecord};
use crate::error::AppError;

/// Accepted header names per logical field (compared after normalization).
const REQUEST_DATE: &[&str] = &["품의일자", "request_date"];
const CAUSE_ACTION_DATE: &[&str] = &["원인행위일", "cause_action_date"];
const PAYMENT_DATE: &[&str] = &["지급일자", "payment_date"];
const MEMO: &[&str] = &["적요", "memo"];
const COUNTERPARTY: &[&str] = &["거래처명", "counterparty"];
const AMOUNT: &[&str] = &["지급액", "금액", "amount"];
const PREPARER: &[&str] = &["작성자", "품의자", "preparer"];

/// Input file kind, resolved from the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(InputFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(InputFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw records + row errors + counts.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub source: PathBuf,
    pub format: InputFormat,
    pub records: Vec<RawRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Column positions of the logical fields.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    request_date: usize,
    cause_action_date: usize,
    payment_date: usize,
    memo: Option<usize>,
    counterparty: Option<usize>,
    amount: Option<usize>,
    preparer: Option<usize>,
}

/// Header row plus `(line, cells)` data rows.
struct Table {
    headers: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
    row_errors: Vec<RowError>,
}

/// Load an input file into raw records.
pub fn load_records(path: &Path) -> Result<IngestedData, AppError> {
    let format = InputFormat::from_path(path).ok_or_else(|| {
        AppError::input(format!(
            "Unsupported input '{}'. Expected .csv, .xlsx, .xlsm, .xls, .xlsb or .ods.",
            path.display()
        ))
    })?;

    let table = match format {
        InputFormat::Csv => read_csv_table(path)?,
        InputFormat::Spreadsheet => read_spreadsheet_table(path)?,
    };
    debug!(columns = ?table.headers, "read input headers");

    let columns = resolve_columns(&table.headers)?;

    let rows_read = table.rows.len() + table.row_errors.len();
    let mut records = Vec::with_capacity(table.rows.len());
    for (line, cells) in &table.rows {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        records.push(build_record(*line, cells, &columns));
    }

    for err in &table.row_errors {
        warn!(line = err.line, "{}", err.message);
    }

    if records.is_empty() {
        return Err(AppError::no_data(format!(
            "No data rows found in '{}'.",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        rows_read,
        records = records.len(),
        skipped = table.row_errors.len(),
        "ingest complete"
    );

    Ok(IngestedData {
        source: path.to_path_buf(),
        format,
        records,
        row_errors: table.row_errors,
        rows_read,
    })
}

fn read_csv_table(path: &Path) -> Result<Table, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, lines are 1-based.
        let line = idx + 2;
        match result {
            Ok(record) => rows.push((line, record.iter().map(str::to_string).collect())),
            Err(e) => row_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    Ok(Table {
        headers,
        rows,
        row_errors,
    })
}

fn read_spreadsheet_table(path: &Path) -> Result<Table, AppError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AppError::input(format!("Failed to open spreadsheet '{}': {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::input(format!("Spreadsheet '{}' has no worksheets.", path.display())))?
        .map_err(|e| AppError::input(format!("Failed to read first worksheet: {e}")))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .ok_or_else(|| AppError::no_data(format!("Spreadsheet '{}' is empty.", path.display())))?
        .iter()
        .map(cell_to_text)
        .collect();

    let rows = rows_iter
        .enumerate()
        .map(|(idx, cells)| (idx + 2, cells.iter().map(cell_to_text).collect()))
        .collect();

    Ok(Table {
        headers,
        rows,
        row_errors: Vec::new(),
    })
}

/// Render a spreadsheet cell the way a text-typed read would see it.
///
/// Whole-number floats lose their `.0` so `20240102.0` reads as `20240102`;
/// native date cells become compact `YYYYMMDD` text.
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y%m%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn resolve_columns(headers: &[String]) -> Result<ColumnMap, AppError> {
    let header_map = build_header_map(headers);
    let find = |aliases: &[&str]| aliases.iter().find_map(|a| header_map.get(*a).copied());
    let require = |aliases: &[&str]| {
        find(aliases).ok_or_else(|| {
            AppError::input(format!(
                "Missing required column: one of {}",
                aliases
                    .iter()
                    .map(|a| format!("`{a}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    };

    Ok(ColumnMap {
        request_date: require(REQUEST_DATE)?,
        cause_action_date: require(CAUSE_ACTION_DATE)?,
        payment_date: require(PAYMENT_DATE)?,
        memo: find(MEMO),
        counterparty: find(COUNTERPARTY),
        amount: find(AMOUNT),
        preparer: find(PREPARER),
    })
}

fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel emits UTF-8 CSVs with a BOM on the first header; strip it or the
    // first column never matches.
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_lowercase().replace([' ', '-'], "_")
}

fn build_record(line: usize, cells: &[String], columns: &ColumnMap) -> RawRecord {
    let get = |idx: usize| cells.get(idx).map(|s| s.trim().to_string()).unwrap_or_default();
    let get_opt = |idx: Option<usize>| idx.map(&get).unwrap_or_default();

    RawRecord {
        line,
        request_date: get(columns.request_date),
        cause_action_date: get(columns.cause_action_date),
        payment_date: get(columns.payment_date),
        passthrough: Passthrough {
            amount: get_opt(columns.amount),
            preparer: get_opt(columns.preparer),
            memo: get_opt(columns.memo),
            counterparty: get_opt(columns.counterparty),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use std::io::Write;

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_korean_headers_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "ledger.csv",
            "\u{feff}품의일자,원인행위일,지급일자,지급액,적요,거래처명\n\
             20240102,20240103,20240108,1500000,노트북 구입,한빛상사\n\
             ,,,,,\n\
             20240105,abcdefgh,20240110,2000,,\n",
        );

        let data = load_records(&path).unwrap();
        assert_eq!(data.format, InputFormat::Csv);
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.records.len(), 2);

        let first = &data.records[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.request_date, "20240102");
        assert_eq!(first.passthrough.amount, "1500000");
        assert_eq!(first.passthrough.memo, "노트북 구입");
        assert_eq!(first.passthrough.counterparty, "한빛상사");
        assert_eq!(first.passthrough.preparer, "");

        let second = &data.records[1];
        assert_eq!(second.line, 4);
        assert_eq!(second.cause_action_date, "abcdefgh");
    }

    #[test]
    fn loads_english_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "ledger.csv",
            "Request Date,cause-action-date,PAYMENT_DATE,preparer\n20240102,20240102,  20240103 ,Lee\n",
        );
        let data = load_records(&path).unwrap();
        // Padding is stripped here; the normalizer itself rejects it.
        assert_eq!(data.records[0].payment_date, "20240103");
        assert_eq!(data.records[0].passthrough.preparer, "Lee");
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "ledger.csv",
            "request_date,cause_action_date,payment_date,memo\n20240102,20240102\n",
        );
        let data = load_records(&path).unwrap();
        assert_eq!(data.records[0].payment_date, "");
        assert_eq!(data.records[0].passthrough.memo, "");
    }

    #[test]
    fn missing_date_column_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "ledger.csv", "request_date,payment_date\n20240102,20240103\n");
        let err = load_records(&path).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.message().contains("cause_action_date"));
    }

    #[test]
    fn header_only_file_has_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "ledger.csv", "request_date,cause_action_date,payment_date\n");
        let err = load_records(&path).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NO_DATA);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_records(Path::new("ledger.txt")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn spreadsheet_cells_render_as_text() {
        assert_eq!(cell_to_text(&Data::Float(20240102.0)), "20240102");
        assert_eq!(cell_to_text(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_text(&Data::Int(20240102)), "20240102");
        assert_eq!(cell_to_text(&Data::String(" 20240102 ".to_string())), "20240102");
        assert_eq!(cell_to_text(&Data::Empty), "");
    }

    #[test]
    fn native_date_cells_render_compact() {
        // Excel serial 45293 is 2024-01-02.
        let serial = ExcelDateTime::new(45293.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_to_text(&Data::DateTime(serial)), "20240102");
        assert_eq!(cell_to_text(&Data::DateTimeIso("2024-01-02".to_string())), "20240102");
        assert_eq!(
            cell_to_text(&Data::DateTimeIso("2024-01-02T09:30:00".to_string())),
            "20240102"
        );
    }

    #[test]
    fn loads_xlsx_workbook() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata/ledger.xlsx");
        let data = load_records(&path).unwrap();
        assert_eq!(data.format, InputFormat::Spreadsheet);
        // Row 3 is blank and skipped, but still counted as read.
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.records.len(), 2);

        let first = &data.records[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.request_date, "20240102");
        assert_eq!(first.cause_action_date, "20240103");
        assert_eq!(first.payment_date, "20240108");
        assert_eq!(first.passthrough.amount, "1500000");
        assert_eq!(first.passthrough.memo, "노트북 구입");

        let second = &data.records[1];
        assert_eq!(second.line, 4);
        assert_eq!(second.request_date, "abc");
        assert_eq!(second.cause_action_date, "");
        assert_eq!(second.payment_date, "20240109");
        assert_eq!(second.passthrough.memo, "비품");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.XLSX")), Some(InputFormat::Spreadsheet));
        assert_eq!(InputFormat::from_path(Path::new("a.csv")), Some(InputFormat::Csv));
        assert_eq!(InputFormat::from_path(Path::new("a")), None);
    }
}
