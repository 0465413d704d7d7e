//! Date helpers for month navigation and event date parsing.
//!
//! Event `start`/`end` values are stored as text. They are usually plain
//! `YYYY-MM-DD` dates but feeds and imports also carry full timestamps, so
//! parsing is lenient and falls back to picking the date apart by hand.
//! `None` stands in for an invalid date throughout.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime};

use crate::error::{CalendarError, CalendarResult};

/// Timestamp layouts accepted besides plain dates and RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// First calendar day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Format as `YYYY-MM-DD`, or an empty string for an invalid date.
pub fn format_iso_date(date: impl Into<Option<NaiveDate>>) -> String {
    match date.into() {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// Parse an event date.
///
/// Tries the native formats first (plain date, RFC 3339, naive timestamps).
/// If none match, splits on `T` and then `-` and rebuilds the date from the
/// three numeric parts. Returns `None` when both strategies fail.
pub fn parse_event_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    parse_native(text).or_else(|| parse_parts(text))
}

fn parse_native(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_parts(text: &str) -> Option<NaiveDate> {
    let date_part = text.split('T').next()?;
    let parts: Vec<&str> = date_part.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return None;
    };

    NaiveDate::from_ymd_opt(
        year.trim().parse().ok()?,
        month.trim().parse().ok()?,
        day.trim().parse().ok()?,
    )
}

/// Compare year, month and day only.
pub fn is_same_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Compare month and day, ignoring the year.
pub fn is_same_month_day<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.month() == b.month() && a.day() == b.day()
}

/// Shift a month by `n` months (negative goes back). Returns the first day
/// of the resulting month; stays put if the shift leaves chrono's range.
pub fn add_months(month: NaiveDate, n: i32) -> NaiveDate {
    let start = start_of_month(month);
    let shifted = if n >= 0 {
        start.checked_add_months(Months::new(n.unsigned_abs()))
    } else {
        start.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    shifted.unwrap_or(start)
}

/// Number of days in the month containing `month`.
pub fn days_in_month(month: NaiveDate) -> u32 {
    let start = start_of_month(month);
    match start.checked_add_months(Months::new(1)) {
        Some(next) => (next - start).num_days() as u32,
        None => 31,
    }
}

/// Parse a `YYYY-MM` month selector into the first day of that month.
pub fn parse_month(text: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", text.trim()), "%Y-%m-%d")
        .map_err(|_| CalendarError::InvalidDate(text.to_string()))
}

/// An entry of the month picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOption {
    /// `YYYY-MM`
    pub value: String,
    /// e.g. "March 2026"
    pub label: String,
}

/// Selectable months: every month from two years before `today` through
/// two years after.
pub fn month_options(today: NaiveDate) -> Vec<MonthOption> {
    let year = today.year();
    ((year - 2)..=(year + 2))
        .flat_map(|y| (1..=12).filter_map(move |m| NaiveDate::from_ymd_opt(y, m, 1)))
        .map(|month| MonthOption {
            value: month.format("%Y-%m").to_string(),
            label: month.format("%B %Y").to_string(),
        })
        .collect()
}
