//! South Korea public holidays.
//!
//! Holidays observed for a year:
//! * New Year's Day (Jan 1)
//! * Seollal: eve, day and day after (lunar)
//! * Independence Movement Day (Mar 1)
//! * Children's Day (May 5)
//! * Buddha's Birthday (lunar)
//! * Memorial Day (Jun 6)
//! * Liberation Day (Aug 15)
//! * Chuseok: eve, day and day after (lunar)
//! * National Foundation Day (Oct 3)
//! * Hangul Day (Oct 9)
//! * Christmas Day (Dec 25)
//! * election days and one-off temporary holidays
//! * substitute holidays
//!
//! Lunar dates and one-off holidays are tabulated for 2020-2026. Other years
//! only get the fixed-date holidays (and their substitutes).

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Seollal, Buddha's Birthday and Chuseok (main day) as `(month, day)`.
const LUNAR_TABLE: &[(i32, (u32, u32), (u32, u32), (u32, u32))] = &[
    (2020, (1, 25), (4, 30), (10, 1)),
    (2021, (2, 12), (5, 19), (9, 21)),
    (2022, (2, 1), (5, 8), (9, 10)),
    (2023, (1, 22), (5, 27), (9, 29)),
    (2024, (2, 10), (5, 15), (9, 17)),
    (2025, (1, 29), (5, 5), (10, 6)),
    (2026, (2, 17), (5, 24), (9, 25)),
];

/// Election days and temporary public holidays.
const ONE_OFF: &[(i32, u32, u32)] = &[
    (2020, 4, 15),
    (2020, 8, 17),
    (2022, 3, 9),
    (2022, 6, 1),
    (2023, 10, 2),
    (2024, 4, 10),
    (2024, 10, 1),
    (2025, 1, 27),
    (2025, 6, 3),
    (2026, 6, 3),
];

/// First year with substitute holidays for Seollal, Chuseok and Children's Day.
const SUBSTITUTE_SINCE: i32 = 2014;
/// First year with weekend substitutes for the national days (Mar 1, Aug 15, Oct 3, Oct 9).
const NATIONAL_DAY_SUBSTITUTE_SINCE: i32 = 2021;
/// First year with substitutes for Buddha's Birthday and Christmas.
const BUDDHA_CHRISTMAS_SUBSTITUTE_SINCE: i32 = 2023;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubstituteRule {
    None,
    Weekend,
    WeekendOrOverlap,
}

/// Whether lunar holidays are tabulated for `year`.
pub fn has_lunar_table(year: i32) -> bool {
    LUNAR_TABLE.iter().any(|(y, ..)| *y == year)
}

/// All South Korea public holidays falling in `year`, ascending.
pub fn korea_holidays(year: i32) -> Vec<NaiveDate> {
    let mut singles: Vec<(NaiveDate, SubstituteRule)> = Vec::new();
    let mut blocks: Vec<[NaiveDate; 3]> = Vec::new();

    let national = if year >= NATIONAL_DAY_SUBSTITUTE_SINCE {
        SubstituteRule::Weekend
    } else {
        SubstituteRule::None
    };
    let children = if year >= SUBSTITUTE_SINCE {
        SubstituteRule::WeekendOrOverlap
    } else {
        SubstituteRule::None
    };
    let christmas = if year >= BUDDHA_CHRISTMAS_SUBSTITUTE_SINCE {
        SubstituteRule::Weekend
    } else {
        SubstituteRule::None
    };
    let buddha = if year >= BUDDHA_CHRISTMAS_SUBSTITUTE_SINCE {
        SubstituteRule::WeekendOrOverlap
    } else {
        SubstituteRule::None
    };

    for (month, day, rule) in [
        (1, 1, SubstituteRule::None),
        (3, 1, national),
        (5, 5, children),
        (6, 6, SubstituteRule::None),
        (8, 15, national),
        (10, 3, national),
        (10, 9, national),
        (12, 25, christmas),
    ] {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            singles.push((date, rule));
        }
    }

    if let Some((_, seollal, buddha_day, chuseok)) = LUNAR_TABLE.iter().find(|(y, ..)| *y == year) {
        if let Some(date) = NaiveDate::from_ymd_opt(year, buddha_day.0, buddha_day.1) {
            singles.push((date, buddha));
        }
        for (month, day) in [seollal, chuseok] {
            if let Some(main) = NaiveDate::from_ymd_opt(year, *month, *day) {
                blocks.push([main - Duration::days(1), main, main + Duration::days(1)]);
            }
        }
    }

    let mut holidays: BTreeSet<NaiveDate> = singles.iter().map(|(d, _)| *d).collect();
    holidays.extend(blocks.iter().flatten().copied());
    holidays.extend(
        ONE_OFF
            .iter()
            .filter(|(y, ..)| *y == year)
            .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(*y, *m, *d)),
    );

    let mut occurrences: HashMap<NaiveDate, usize> = HashMap::new();
    for d in singles.iter().map(|(d, _)| *d).chain(blocks.iter().flatten().copied()) {
        *occurrences.entry(d).or_default() += 1;
    }
    let overlaps = |d: NaiveDate| occurrences.get(&d).copied().unwrap_or(0) > 1;

    // Each anchor produces one substitute: the first following weekday that is
    // not already a holiday.
    let mut anchors: Vec<NaiveDate> = Vec::new();
    let mut overlap_claimed: HashSet<NaiveDate> = HashSet::new();

    if year >= SUBSTITUTE_SINCE {
        for block in &blocks {
            let sunday = block.iter().any(|d| d.weekday() == Weekday::Sun);
            let overlapping: Vec<NaiveDate> = block.iter().copied().filter(|d| overlaps(*d)).collect();
            if sunday || !overlapping.is_empty() {
                overlap_claimed.extend(overlapping);
                anchors.push(block[2]);
            }
        }
    }

    for (date, rule) in &singles {
        match rule {
            SubstituteRule::None => {}
            SubstituteRule::Weekend => {
                if is_weekend(*date) {
                    anchors.push(*date);
                }
            }
            SubstituteRule::WeekendOrOverlap => {
                if is_weekend(*date) || (overlaps(*date) && overlap_claimed.insert(*date)) {
                    anchors.push(*date);
                }
            }
        }
    }

    anchors.sort_unstable();
    for anchor in anchors {
        let mut d = anchor + Duration::days(1);
        while is_weekend(d) || holidays.contains(&d) {
            d += Duration::days(1);
        }
        holidays.insert(d);
    }

    holidays.into_iter().collect()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn holidays_2024() {
        let expected = vec![
            ymd(2024, 1, 1),
            ymd(2024, 2, 9),
            ymd(2024, 2, 10),
            ymd(2024, 2, 11),
            ymd(2024, 2, 12),
            ymd(2024, 3, 1),
            ymd(2024, 4, 10),
            ymd(2024, 5, 5),
            ymd(2024, 5, 6),
            ymd(2024, 5, 15),
            ymd(2024, 6, 6),
            ymd(2024, 8, 15),
            ymd(2024, 9, 16),
            ymd(2024, 9, 17),
            ymd(2024, 9, 18),
            ymd(2024, 10, 1),
            ymd(2024, 10, 3),
            ymd(2024, 10, 9),
            ymd(2024, 12, 25),
        ];
        assert_eq!(korea_holidays(2024), expected);
    }

    #[test]
    fn seollal_on_sunday_gets_substitute() {
        // 2023-01-22 (Seollal) is a Sunday.
        let h = korea_holidays(2023);
        assert!(h.contains(&ymd(2023, 1, 24)));
        // Buddha's Birthday on Saturday 2023-05-27 -> Monday 05-29.
        assert!(h.contains(&ymd(2023, 5, 29)));
    }

    #[test]
    fn overlap_produces_single_substitute() {
        // 2025-05-05 is both Children's Day and Buddha's Birthday.
        let h = korea_holidays(2025);
        assert!(h.contains(&ymd(2025, 5, 6)));
        assert!(!h.contains(&ymd(2025, 5, 7)));
        // Chuseok block 10-05..10-07 includes a Sunday -> 10-08.
        assert!(h.contains(&ymd(2025, 10, 8)));
        // Independence Movement Day on Saturday -> Monday.
        assert!(h.contains(&ymd(2025, 3, 3)));
    }

    #[test]
    fn national_day_substitutes_start_in_2021() {
        // 2021-08-15 and 2021-10-03 are Sundays, 2021-10-09 a Saturday.
        let h = korea_holidays(2021);
        assert!(h.contains(&ymd(2021, 8, 16)));
        assert!(h.contains(&ymd(2021, 10, 4)));
        assert!(h.contains(&ymd(2021, 10, 11)));

        // 2020-10-03 is a Saturday but had no substitute.
        let h = korea_holidays(2020);
        assert!(!h.contains(&ymd(2020, 10, 5)));
    }

    #[test]
    fn christmas_substitute_from_2023() {
        // 2022-12-25 is a Sunday: no substitute yet.
        assert!(!korea_holidays(2022).contains(&ymd(2022, 12, 26)));
    }

    #[test]
    fn untabulated_year_has_fixed_holidays_only() {
        assert!(!has_lunar_table(2030));
        let h = korea_holidays(2030);
        assert!(h.contains(&ymd(2030, 1, 1)));
        assert!(h.contains(&ymd(2030, 12, 25)));
        // 2030-06-06 is a Thursday; Memorial Day never gets a substitute anyway.
        assert!(h.contains(&ymd(2030, 6, 6)));
        assert!(h.iter().all(|d| d.year() == 2030 || d.year() == 2031));
    }
}
