//! Calendar date helpers shared by the task board, the task form and the
//! topics computed fields. Dates are stored as `YYYY-MM-DD` text.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stand-in for missing or invalid dates when sorting: far enough in the
/// future that real dates always come first.
pub fn sentinel() -> NaiveDate {
    NaiveDate::from_ymd_opt(3000, 1, 1).unwrap_or(NaiveDate::MAX)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse `YYYY-MM-DD`; surrounding whitespace is ignored, anything else is `None`.
pub fn parse(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

pub fn format(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Date used as a sort key: the parsed date, or [`sentinel`].
pub fn sort_key(text: &str) -> NaiveDate {
    parse(text).unwrap_or_else(sentinel)
}

/// Signed number of days from `today` to the date in `text`.
pub fn days_until(text: &str, today: NaiveDate) -> Option<i64> {
    parse(text).map(|d| (d - today).num_days())
}

/// Shift a date by `days`. An empty or invalid date becomes `today`.
pub fn shift(text: &str, days: i64, today: NaiveDate) -> String {
    match parse(text) {
        Some(d) => format(d + Duration::days(days)),
        None => format(today),
    }
}

/// True if `text` is empty or a valid date.
pub fn is_valid_or_empty(text: &str) -> bool {
    text.trim().is_empty() || parse(text).is_some()
}

/// English weekday name, or an empty string for empty/invalid input.
pub fn weekday_name(text: &str) -> &'static str {
    match parse(text).map(|d| d.weekday()) {
        Some(Weekday::Mon) => "Monday",
        Some(Weekday::Tue) => "Tuesday",
        Some(Weekday::Wed) => "Wednesday",
        Some(Weekday::Thu) => "Thursday",
        Some(Weekday::Fri) => "Friday",
        Some(Weekday::Sat) => "Saturday",
        Some(Weekday::Sun) => "Sunday",
        None => "",
    }
}
