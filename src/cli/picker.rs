//! Interactive input-file picker.
//!
//! Used when `paylag run` is given no file: lists the spreadsheet and CSV
//! exports found under the current directory and lets the user pick one.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::io::ingest::InputFormat;

/// Default directory recursion depth when looking for input files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt on stdin/stdout for an input file from the current directory tree.
pub fn prompt_for_input_path() -> Result<PathBuf, AppError> {
    let files = discover_input_files(Path::new("."));
    let stdin = io::stdin();
    let stdout = io::stdout();
    prompt_with(&files, &mut stdin.lock(), &mut stdout.lock())
}

/// Prompt loop over arbitrary reader/writer.
///
/// Behavior:
/// - list discovered files
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_with<R: BufRead, W: Write>(files: &[PathBuf], input: &mut R, output: &mut W) -> Result<PathBuf, AppError> {
    if files.is_empty() {
        return Err(AppError::input(
            "No .csv or .xlsx files found. Provide one with `paylag run <file>`.",
        ));
    }

    let write_err = |e: io::Error| AppError::input(format!("Failed to write prompt: {e}"));

    writeln!(output, "Found {} input file(s):", files.len()).map_err(write_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(output, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(write_err)?;
    }

    loop {
        write!(
            output,
            "Select a file by number (1-{}) or type a path (q to quit): ",
            files.len()
        )
        .map_err(write_err)?;
        output.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::input(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::input(
                "No input received. Provide a file with `paylag run <file>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::input("Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_input_path(&files[choice - 1]);
            }
            writeln!(output, "Invalid choice: {choice}. Enter a number between 1 and {}.", files.len())
                .map_err(write_err)?;
            continue;
        }

        match validate_input_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => {
                writeln!(output, "{err}").map_err(write_err)?;
            }
        }
    }
}

/// Validate the path points to an existing file of a supported format.
pub fn validate_input_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::input(format!("Input file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::input(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    if InputFormat::from_path(path).is_none() {
        return Err(AppError::input(format!(
            "Expected a .csv or spreadsheet file (got: {}).",
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// Discover supported input files under `root` (deterministic order).
pub fn discover_input_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_inner(root, 0, DEFAULT_SEARCH_DEPTH, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if should_skip_dir(&path) {
                continue;
            }
            find_inner(&path, depth + 1, max_depth, out);
            continue;
        }

        // Skip Excel lock files (`~$ledger.xlsx`).
        let is_lock_file = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.starts_with("~$"));
        if file_type.is_file() && !is_lock_file && InputFormat::from_path(&path).is_some() {
            out.push(path);
        }
    }
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
