//! Ordering of education/experience entries by the end of their free-text
//! date range ("March 2021 — Present", "2019 — 2023", a bare year).
//!
//! Parsing is total: anything unrecognized resolves to the "ongoing"
//! sentinel (next year, December) so a malformed date never rejects a save,
//! and ongoing entries sort ahead of every concrete end date.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;

/// The em-dash used as the range separator in the stored documents.
const RANGE_SEPARATOR: char = '\u{2014}';

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{4})$",
    )
    .expect("month-year pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EndDate {
    pub year: i32,
    pub month: u32,
}

impl EndDate {
    fn ongoing(current_year: i32) -> Self {
        Self {
            year: current_year + 1,
            month: 12,
        }
    }
}

/// Resolve a date-range string to its end date. Missing, blank, "present"
/// and unparseable inputs all collapse to the same ongoing sentinel.
pub fn parse_end_date(range: Option<&str>) -> EndDate {
    parse_end_date_at(range, Utc::now().year())
}

fn parse_end_date_at(range: Option<&str>, current_year: i32) -> EndDate {
    let ongoing = EndDate::ongoing(current_year);

    let Some(range) = range else {
        return ongoing;
    };
    if range.trim().is_empty() {
        return ongoing;
    }

    let parts: Vec<&str> = range.split(RANGE_SEPARATOR).map(str::trim).collect();
    if parts.len() < 2 {
        // No separator: treat the whole string as a bare end year.
        let year = parts[0].parse().unwrap_or(ongoing.year);
        return EndDate { year, month: 12 };
    }

    let end = parts[1];
    if end.to_lowercase().contains("present") {
        return ongoing;
    }

    if let Some(caps) = MONTH_YEAR.captures(end) {
        let month = MONTH_NAMES
            .iter()
            .position(|name| *name == &caps[1])
            .map(|index| index as u32 + 1)
            .unwrap_or(12);
        let year = caps[2].parse().unwrap_or(ongoing.year);
        return EndDate { year, month };
    }

    let year = end.parse().unwrap_or(ongoing.year);
    EndDate { year, month: 12 }
}

/// Return a new list ordered by end date descending (most recent or ongoing
/// first). The sort is stable, so entries with equal end dates keep their
/// input order; the input is left untouched.
pub fn sort_by_end_date<T, F>(items: &[T], date_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<&str>,
{
    let mut sorted = items.to_vec();
    sorted.sort_by_cached_key(|item| Reverse(parse_end_date(date_of(item))));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2026;

    fn parse(range: &str) -> EndDate {
        parse_end_date_at(Some(range), YEAR)
    }

    #[test]
    fn blank_missing_and_present_share_the_sentinel() {
        let sentinel = EndDate {
            year: YEAR + 1,
            month: 12,
        };
        assert_eq!(parse_end_date_at(None, YEAR), sentinel);
        assert_eq!(parse(""), sentinel);
        assert_eq!(parse("   "), sentinel);
        assert_eq!(parse("March 2024 — Present"), sentinel);
        assert_eq!(parse("2020 — present"), sentinel);
    }

    #[test]
    fn month_and_year_end() {
        assert_eq!(parse("March 2021 — December 2023"), EndDate { year: 2023, month: 12 });
        assert_eq!(parse("2019 — February 2020"), EndDate { year: 2020, month: 2 });
    }

    #[test]
    fn numeric_year_end() {
        assert_eq!(parse("2019 — 2021"), EndDate { year: 2021, month: 12 });
    }

    #[test]
    fn bare_year_without_separator() {
        assert_eq!(parse("2020"), EndDate { year: 2020, month: 12 });
        // A single unparseable segment is treated as ongoing.
        assert_eq!(
            parse("sometime"),
            EndDate {
                year: YEAR + 1,
                month: 12
            }
        );
    }

    #[test]
    fn unparseable_end_falls_back_to_ongoing() {
        assert_eq!(
            parse("2019 — soon"),
            EndDate {
                year: YEAR + 1,
                month: 12
            }
        );
    }

    #[test]
    fn sorts_descending_with_present_first() {
        let entries = vec![
            ("a", "2020"),
            ("b", "2022"),
            ("c", "Present"),
            ("d", "2019 — 2021"),
        ];
        let sorted = sort_by_end_date(&entries, |entry| Some(entry.1));
        let order: Vec<&str> = sorted.iter().map(|entry| entry.0).collect();
        assert_eq!(order, vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let entries = vec![
            ("first", "2018 — Present"),
            ("second", ""),
            ("third", "2019 — Present"),
            ("dated", "2015 — 2017"),
        ];
        let sorted = sort_by_end_date(&entries, |entry| Some(entry.1));
        let order: Vec<&str> = sorted.iter().map(|entry| entry.0).collect();
        assert_eq!(order, vec!["first", "second", "third", "dated"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let entries = vec![("a", "2020"), ("b", "Present")];
        let _ = sort_by_end_date(&entries, |entry| Some(entry.1));
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[1].0, "b");
    }

    #[test]
    fn months_order_within_a_year() {
        let a = parse("2020 — March 2021");
        let b = parse("2020 — November 2021");
        assert!(b > a);
    }
}
