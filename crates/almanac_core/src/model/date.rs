//! Canonical `YYYY-MM-DD` date helpers.

use chrono::NaiveDate;

/// Storage and lookup key format for every date in core.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a canonical `YYYY-MM-DD` date, ignoring surrounding whitespace.
///
/// Returns `None` for any other shape, including impossible calendar dates
/// such as `2026-02-30`, unpadded fields and signed or short years.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).ok()?;
    // chrono accepts `2026-2-18` and `+2026-02-18`; only the canonical key passes.
    (format_date(date) == value).then_some(date)
}

/// Formats a date into its canonical storage key.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
