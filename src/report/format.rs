//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the counting code stays clean and testable
//! - output changes are localized

use crate::domain::{EnrichedRecord, LabelSet};
use crate::io::export::{fmt_date, fmt_metric};
use crate::report::RunSummary;

/// Format the run summary (input counts + calendar + business-day stats).
pub fn format_run_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("=== paylag - approval-to-payment lag ===\n");
    out.push_str(&format!("Input: {}\n", summary.source.display()));
    out.push_str(&format!("Holiday calendar: {}\n", summary.holiday_calendar));
    out.push_str(&format!(
        "Rows: read={} | records={} | skipped={}\n",
        summary.rows_read, summary.records, summary.skipped_rows
    ));
    out.push_str(&format!(
        "Missing dates: request={} | cause-action={} | payment={}\n",
        summary.missing_request_date, summary.missing_cause_action_date, summary.missing_payment_date
    ));
    match (summary.mean_business_days, summary.max_business_days) {
        (Some(mean), Some(max)) => {
            out.push_str(&format!("Business days (request->payment): mean={mean:.2} | max={max}\n"));
        }
        _ => out.push_str("Business days (request->payment): n/a\n"),
    }

    out
}

/// Record table columns as `(width, right-aligned)`: `(width, right-aligned)`.
const TABLE_COLUMNS: [(usize, bool); 9] = [
    (10, false),
    (10, false),
    (10, false),
    (6, true),
    (6, true),
    (6, true),
    (14, true),
    (16, false),
    (24, false),
];

/// Format the record table (already sorted by payment date).
///
/// `top_n = 0` prints every record. Widths are terminal columns, so Korean
/// labels and memos stay aligned.
pub fn format_records_table(records: &[EnrichedRecord], labels: LabelSet, top_n: usize) -> String {
    let cols = labels.columns();
    let shown = if top_n == 0 { records.len() } else { top_n.min(records.len()) };

    let mut out = String::new();
    push_row(
        &mut out,
        [cols[2], cols[0], cols[1], "c->p", "r->p", "bdays", cols[8], cols[7], cols[6]].map(str::to_string),
    );
    push_row(&mut out, TABLE_COLUMNS.map(|(width, _)| "-".repeat(width)));

    for r in &records[..shown] {
        let rec = &r.record;
        let m = &r.metrics;
        push_row(
            &mut out,
            [
                or_dash(fmt_date(rec.payment_date)),
                or_dash(fmt_date(rec.request_date)),
                or_dash(fmt_date(rec.cause_action_date)),
                or_dash(fmt_metric(m.calendar_days_cause_to_payment)),
                or_dash(fmt_metric(m.calendar_days_request_to_payment)),
                or_dash(fmt_metric(m.business_days_request_to_payment)),
                format_amount(&rec.passthrough.amount),
                rec.passthrough.counterparty.clone(),
                rec.passthrough.memo.clone(),
            ],
        );
    }

    if shown < records.len() {
        out.push_str(&format!("... {} more (use --top 0 to show all)\n", records.len() - shown));
    }

    out
}

fn push_row(out: &mut String, cells: [String; 9]) {
    let line: Vec<String> = cells
        .iter()
        .zip(TABLE_COLUMNS)
        .map(|(cell, (width, right))| pad(&truncate(cell, width), width, right))
        .collect();
    out.push_str(line.join(" ").trim_end());
    out.push('\n');
}

/// Group the integer part of a numeric amount with commas.
///
/// `"1234567"` -> `"1,234,567"`, `"-1234.5"` -> `"-1,234.5"`. Text that is not a
/// plain number (or already grouped) is returned unchanged.
pub fn format_amount(raw: &str) -> String {
    let s = raw.trim();
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };

    let is_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(int_part) || frac_part.is_some_and(|f| !is_digits(f)) {
        return s.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn or_dash(s: String) -> String {
    if s.is_empty() { "-".to_string() } else { s }
}

/// Cut `s` to at most `max` terminal columns, marking the cut with `.`.
fn truncate(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = char_width(ch);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('.');
    out
}

fn pad(s: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(s)));
    if right { format!("{fill}{s}") } else { format!("{s}{fill}") }
}

fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Hangul and CJK ideographs take two terminal columns.
fn char_width(ch: char) -> usize {
    match ch as u32 {
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA960..=0xA97F
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6 => 2,
        _ => 1,
    }
}
