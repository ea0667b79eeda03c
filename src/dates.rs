// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Date parsing and duration formatting for CV entries
//!
//! Source data mixes `DD.MM.YYYY` and `YYYY-MM` dates with the odd free-form
//! value. Parsing never fails loudly: anything unrecognised becomes `None`
//! and simply contributes nothing to a duration.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A start/end pair as it appears in the data files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Start date string
    #[serde(default)]
    pub start_date: Option<String>,
    /// End date string; `None` means ongoing
    #[serde(default)]
    pub end_date: Option<String>,
}

impl DateRange {
    /// Build a range from string slices
    #[must_use]
    pub fn new(start: &str, end: Option<&str>) -> Self {
        Self {
            start_date: Some(start.to_string()),
            end_date: end.map(String::from),
        }
    }
}

/// Parse a date string
///
/// Recognises `DD.MM.YYYY` and `YYYY-MM` (day 1) first, then falls back to a
/// handful of generic layouts. Impossible calendar dates such as
/// `31.02.2020` are rejected rather than rolled over.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let dotted: Vec<&str> = s.split('.').collect();
    if dotted.len() == 3 && dotted.iter().all(|p| is_digits(p)) {
        let day = dotted[0].parse().ok()?;
        let month = dotted[1].parse().ok()?;
        let year = dotted[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let dashed: Vec<&str> = s.split('-').collect();
    if dashed.len() == 2 && dashed.iter().all(|p| is_digits(p)) {
        let year = dashed[0].parse().ok()?;
        let month = dashed[1].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    parse_generic(s)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    // MM.YYYY
    if let Some((month, year)) = s.split_once('.') {
        if is_digits(month) && is_digits(year) && year.len() == 4 {
            return NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1);
        }
    }

    // "Jan 2020" / "January 2020"
    if let Ok(d) = NaiveDate::parse_from_str(&format!("1 {s}"), "%d %B %Y") {
        return Some(d);
    }

    if is_digits(s) && s.len() == 4 {
        return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
    }

    None
}

/// Total span covered by `ranges`, measured from today for ongoing entries
#[must_use]
pub fn calculate_duration(ranges: &[DateRange]) -> String {
    calculate_duration_at(ranges, Local::now().date_naive())
}

/// Total span covered by `ranges`, treating a missing end as `today`
///
/// Overlapping ranges are not summed: the result is the distance between the
/// earliest start and the latest end. Returns an empty string when nothing
/// parses or the span is not positive.
#[must_use]
pub fn calculate_duration_at(ranges: &[DateRange], today: NaiveDate) -> String {
    let mut earliest: Option<NaiveDate> = None;
    let mut latest: Option<NaiveDate> = None;

    for range in ranges {
        let Some(start) = range.start_date.as_deref().and_then(parse_date) else {
            continue;
        };
        let end = match range.end_date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => match parse_date(raw) {
                Some(d) => d,
                None => continue,
            },
        };

        earliest = Some(earliest.map_or(start, |e| e.min(start)));
        latest = Some(latest.map_or(end, |l| l.max(end)));
    }

    match (earliest, latest) {
        (Some(start), Some(end)) => format_months(months_between(start, end)),
        _ => String::new(),
    }
}

fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    years * 12 + months
}

fn format_months(total: i64) -> String {
    if total <= 0 {
        return String::new();
    }

    let years = total / 12;
    let months = total % 12;
    let mut parts = Vec::with_capacity(2);

    if years > 0 {
        parts.push(format!("{years} {}", if years == 1 { "yr" } else { "yrs" }));
    }
    if months > 0 {
        parts.push(format!("{months} {}", if months == 1 { "mo" } else { "mos" }));
    }

    parts.join(" ")
}

/// Short month-year label, e.g. `Jan 2020`
#[must_use]
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Human label for a range, e.g. `Jan 2020 – Present`
///
/// Empty when the start does not parse; an unparseable end is shown verbatim.
#[must_use]
pub fn format_period(range: &DateRange) -> String {
    let Some(start) = range.start_date.as_deref().and_then(parse_date) else {
        return String::new();
    };

    let end = match range.end_date.as_deref().map(str::trim) {
        None | Some("") => "Present".to_string(),
        Some(raw) => parse_date(raw).map_or_else(|| raw.to_string(), format_month_year),
    };

    format!("{} – {}", format_month_year(start), end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn calendar_date() -> impl Strategy<Value = NaiveDate> {
        (1000i32..=9999, 1u32..=12, 1u32..=31)
            .prop_filter_map("not a calendar date", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    }

    proptest! {
        #[test]
        fn prop_dotted_dates_round_trip(date in calendar_date()) {
            let text = format!("{:02}.{:02}.{:04}", date.day(), date.month(), date.year());
            prop_assert_eq!(parse_date(&text), Some(date));
        }

        #[test]
        fn prop_year_month_is_first_of_month(date in calendar_date()) {
            let text = format!("{:04}-{:02}", date.year(), date.month());
            let parsed = parse_date(&text).unwrap();
            prop_assert_eq!((parsed.year(), parsed.month(), parsed.day()), (date.year(), date.month(), 1));
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(parse_date("15.03.2021"), Some(ymd(2021, 3, 15)));
        assert_eq!(parse_date(" 01.12.1999 "), Some(ymd(1999, 12, 1)));
    }

    #[test]
    fn test_parse_dotted_rejects_rollover() {
        assert_eq!(parse_date("31.02.2020"), None);
        assert_eq!(parse_date("00.01.2020"), None);
        assert_eq!(parse_date("10.13.2020"), None);
    }

    #[test]
    fn test_parse_year_month_defaults_to_first() {
        assert_eq!(parse_date("2020-07"), Some(ymd(2020, 7, 1)));
        assert_eq!(parse_date("2020-13"), None);
    }

    #[test]
    fn test_parse_generic_fallbacks() {
        assert_eq!(parse_date("2020-07-19"), Some(ymd(2020, 7, 19)));
        assert_eq!(parse_date("2020-07-19T10:00:00Z"), Some(ymd(2020, 7, 19)));
        assert_eq!(parse_date("01.2020"), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_date("March 2018"), Some(ymd(2018, 3, 1)));
        assert_eq!(parse_date("2018"), Some(ymd(2018, 1, 1)));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("1.2.3.4"), None);
    }

    #[test]
    fn test_duration_one_year() {
        let ranges = [DateRange::new("01.2020", Some("01.2021"))];
        assert_eq!(calculate_duration_at(&ranges, ymd(2024, 1, 1)), "1 yr");
    }

    #[test]
    fn test_duration_zero_span_is_empty() {
        let ranges = [DateRange::new("2020-01", Some("2020-01"))];
        assert_eq!(calculate_duration_at(&ranges, ymd(2024, 1, 1)), "");
    }

    #[test]
    fn test_duration_pluralisation() {
        let today = ymd(2024, 1, 1);
        let one_month = [DateRange::new("2020-01", Some("2020-02"))];
        let mixed = [DateRange::new("2018-01", Some("2020-04"))];
        let only_years = [DateRange::new("2018-05", Some("2021-05"))];

        assert_eq!(calculate_duration_at(&one_month, today), "1 mo");
        assert_eq!(calculate_duration_at(&mixed, today), "2 yrs 3 mos");
        assert_eq!(calculate_duration_at(&only_years, today), "3 yrs");
    }

    #[test]
    fn test_duration_uses_union_span_not_sum() {
        let ranges = [
            DateRange::new("2019-01", Some("2020-01")),
            DateRange::new("2019-06", Some("2020-06")),
        ];
        assert_eq!(calculate_duration_at(&ranges, ymd(2024, 1, 1)), "1 yr 5 mos");
    }

    #[test]
    fn test_duration_open_range_runs_to_today() {
        let ranges = [DateRange::new("01.01.2023", None)];
        assert_eq!(calculate_duration_at(&ranges, ymd(2024, 3, 10)), "1 yr 2 mos");
    }

    #[test]
    fn test_duration_skips_unparseable() {
        let today = ymd(2024, 1, 1);
        let ranges = [
            DateRange::new("nonsense", Some("2020-01")),
            DateRange::new("2020-01", Some("2020-04")),
            DateRange::new("2010-01", Some("garbage")),
        ];
        assert_eq!(calculate_duration_at(&ranges, today), "3 mos");
        assert_eq!(calculate_duration_at(&[], today), "");
    }

    #[test]
    fn test_duration_negative_span_is_empty() {
        let ranges = [DateRange::new("2021-01", Some("2020-01"))];
        assert_eq!(calculate_duration_at(&ranges, ymd(2024, 1, 1)), "");
    }

    #[test]
    fn test_format_period() {
        assert_eq!(
            format_period(&DateRange::new("01.02.2020", Some("2021-03"))),
            "Feb 2020 – Mar 2021"
        );
        assert_eq!(format_period(&DateRange::new("2020-02", None)), "Feb 2020 – Present");
        assert_eq!(format_period(&DateRange::new("??", None)), "");
    }

    #[test]
    fn test_date_range_json_shape() {
        let range: DateRange =
            serde_json::from_str(r#"{"startDate":"2020-01","endDate":null}"#).unwrap();
        assert_eq!(range, DateRange::new("2020-01", None));
    }
}
