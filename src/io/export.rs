//! Export enriched records to CSV.
//!
//! The file starts with a UTF-8 BOM so spreadsheet tools pick the right
//! encoding for the Korean headers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::domain::{DateField, EnrichedRecord, LabelSet, Metric};
use crate::error::AppError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write enriched records to a CSV file.
pub fn write_results_csv(path: &Path, records: &[EnrichedRecord], labels: LabelSet) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    file.write_all(UTF8_BOM)
        .map_err(|e| AppError::output(format!("Failed to write export CSV: {e}")))?;

    write_results(file, records, labels)?;

    info!(path = %path.display(), rows = records.len(), "wrote CSV export");
    Ok(())
}

/// Write the CSV body (header + rows) to any writer.
pub fn write_results<W: Write>(writer: W, records: &[EnrichedRecord], labels: LabelSet) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(labels.columns())
        .map_err(|e| AppError::output(format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        let rec = &r.record;
        let m = &r.metrics;
        out.write_record([
            fmt_date(rec.request_date),
            fmt_date(rec.cause_action_date),
            fmt_date(rec.payment_date),
            fmt_metric(m.calendar_days_cause_to_payment),
            fmt_metric(m.calendar_days_request_to_payment),
            fmt_metric(m.business_days_request_to_payment),
            rec.passthrough.memo.clone(),
            rec.passthrough.counterparty.clone(),
            rec.passthrough.amount.clone(),
            rec.passthrough.preparer.clone(),
        ])
        .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// `YYYY-MM-DD`, or empty when missing.
pub fn fmt_date(d: DateField) -> String {
    d.date().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Integer text, or empty when undefined.
pub fn fmt_metric(m: Metric) -> String {
    m.value().map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{ApprovalRecord, DerivedMetrics, Passthrough};

    fn sample() -> EnrichedRecord {
        EnrichedRecord {
            record: ApprovalRecord {
                line: 2,
                request_date: DateField::Present(NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()),
                cause_action_date: DateField::Missing,
                payment_date: DateField::Present(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
                passthrough: Passthrough {
                    amount: "1200".to_string(),
                    preparer: "Park".to_string(),
                    memo: "desk, chair".to_string(),
                    counterparty: "Hanbit".to_string(),
                },
            },
            metrics: DerivedMetrics {
                calendar_days_cause_to_payment: Metric::Undefined,
                calendar_days_request_to_payment: Metric::Value(-9),
                business_days_request_to_payment: Metric::Value(0),
            },
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut buf = Vec::new();
        write_results(&mut buf, &[sample()], LabelSet::En).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "request_date,cause_action_date,payment_date,days_cause_to_payment,\
             days_request_to_payment,business_days_request_to_payment,memo,counterparty,amount,preparer"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-05-10,,2024-05-01,,-9,0,\"desk, chair\",Hanbit,1200,Park"
        );
    }

    #[test]
    fn file_export_starts_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_results_csv(&path, &[sample()], LabelSet::Ko).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.starts_with("품의일자,원인행위일,지급일자,"));
    }

    #[test]
    fn unwritable_path_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_results_csv(&path, &[], LabelSet::En).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_OUTPUT);
    }
}
