//! `YYYYMMDD` text -> `DateField`.
//!
//! Anything that is not exactly eight ASCII digits forming a real calendar date
//! becomes `DateField::Missing`. A bad cell must not abort a batch, so there is
//! no error path here.

use chrono::NaiveDate;

use crate::domain::{ApprovalRecord, DateField, RawRecord};

/// Parse a compact `YYYYMMDD` date.
///
/// Wrong length (including surrounding whitespace), non-digits, empty input and
/// impossible dates (month 13, Feb 30, ...) all yield `Missing`. Cell trimming
/// belongs to the tabular source.
pub fn normalize(raw: &str) -> DateField {
    parse_compact(raw).map_or(DateField::Missing, DateField::Present)
}

/// Normalize the three date cells of a raw row; passthrough fields are moved as-is.
pub fn normalize_record(raw: RawRecord) -> ApprovalRecord {
    ApprovalRecord {
        line: raw.line,
        request_date: normalize(&raw.request_date),
        cause_action_date: normalize(&raw.cause_action_date),
        payment_date: normalize(&raw.payment_date),
        passthrough: raw.passthrough,
    }
}

fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Passthrough;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_compact_dates() {
        assert_eq!(normalize("20240102"), DateField::Present(ymd(2024, 1, 2)));
        assert_eq!(normalize("20241231"), DateField::Present(ymd(2024, 12, 31)));
        assert_eq!(normalize("20240229"), DateField::Present(ymd(2024, 2, 29)));
    }

    #[test]
    fn malformed_input_is_missing() {
        for raw in [
            "",
            "   ",
            "abcdefgh",
            "2024010",
            "202401021",
            "2024-01-02",
            "20241301",
            "20240230",
            "20230229",
            "20240100",
            "+2024010",
            "２０２４０１０２",
            " 20240102",
            "20240102 ",
            "\t20240102\n",
        ] {
            assert_eq!(normalize(raw), DateField::Missing, "input {raw:?}");
        }
    }

    #[test]
    fn normalize_record_keeps_passthrough() {
        let raw = RawRecord {
            line: 7,
            request_date: "20240102".to_string(),
            cause_action_date: "abcdefgh".to_string(),
            payment_date: "20240108".to_string(),
            passthrough: Passthrough {
                amount: "1500000".to_string(),
                preparer: "Kim".to_string(),
                memo: "laptop".to_string(),
                counterparty: "ACME".to_string(),
            },
        };
        let record = normalize_record(raw.clone());
        assert_eq!(record.line, 7);
        assert_eq!(record.request_date, DateField::Present(ymd(2024, 1, 2)));
        assert_eq!(record.cause_action_date, DateField::Missing);
        assert_eq!(record.payment_date, DateField::Present(ymd(2024, 1, 8)));
        assert_eq!(record.passthrough, raw.passthrough);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn date_strategy() -> impl Strategy<Value = NaiveDate> {
            (1000i32..=9999i32, 1u32..13u32, 1u32..32u32).prop_filter_map(
                "valid date",
                |(year, month, day)| NaiveDate::from_ymd_opt(year, month, day),
            )
        }

        proptest! {
            #[test]
            fn valid_strings_round_trip_components(date in date_strategy()) {
                let s = date.format("%Y%m%d").to_string();
                prop_assert_eq!(normalize(&s), DateField::Present(date));
            }

            #[test]
            fn padded_dates_are_missing(date in date_strategy(), lead in "[ \t]{0,2}", trail in "[ \t]{0,2}") {
                prop_assume!(!lead.is_empty() || !trail.is_empty());
                let s = format!("{lead}{}{trail}", date.format("%Y%m%d"));
                prop_assert_eq!(normalize(&s), DateField::Missing);
            }

            #[test]
            fn wrong_length_digit_strings_are_missing(s in "[0-9]{0,7}|[0-9]{9,12}") {
                prop_assert_eq!(normalize(&s), DateField::Missing);
            }

            #[test]
            fn non_digit_strings_are_missing(s in "[0-9]{0,7}[A-Za-z/.-][0-9]{0,7}") {
                prop_assert_eq!(normalize(&s), DateField::Missing);
            }
        }
    }
}
