//! Rule table source format and load-time validation.
//!
//! # Responsibility
//! - Deserialize the JSON rule table shipped with the crate.
//! - Reject malformed tables before any lookup can observe them.
//!
//! # Invariants
//! - Every date belongs to the table's declared year.
//! - A date appears at most once per exact-date table. Collisions between the
//!   holiday and observance tables are legal and resolved at lookup time.
//! - School-break ranges are closed intervals with `start <= end`.

use crate::model::date::parse_date;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rule table bundled for Sarawak 2026.
pub const BUILTIN_TABLE_JSON: &str = include_str!("../../data/sarawak_2026.json");

pub(crate) const HOLIDAY_TABLE: &str = "public_holidays";
pub(crate) const OBSERVANCE_TABLE: &str = "observances";
pub(crate) const SCHOOL_BREAK_TABLE: &str = "school_breaks";

/// Errors raised while loading a rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTableError {
    Malformed(String),
    InvalidDate {
        table: &'static str,
        value: String,
    },
    OutOfYear {
        table: &'static str,
        date: NaiveDate,
        year: i32,
    },
    BlankName {
        table: &'static str,
        date: NaiveDate,
    },
    DuplicateDate {
        table: &'static str,
        date: NaiveDate,
    },
    ReversedRange {
        label: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl Display for RuleTableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(details) => write!(f, "malformed rule table: {details}"),
            Self::InvalidDate { table, value } => {
                write!(f, "invalid date `{value}` in {table}")
            }
            Self::OutOfYear { table, date, year } => {
                write!(f, "date {date} in {table} is outside table year {year}")
            }
            Self::BlankName { table, date } => write!(f, "blank name for {date} in {table}"),
            Self::DuplicateDate { table, date } => {
                write!(f, "date {date} listed more than once in {table}")
            }
            Self::ReversedRange { label, start, end } => {
                write!(f, "school break `{label}` starts {start} after it ends {end}")
            }
        }
    }
}

impl Error for RuleTableError {}

#[derive(Debug, Deserialize)]
struct RuleTableSource {
    year: i32,
    #[serde(default)]
    region: String,
    #[serde(default)]
    public_holidays: Vec<DatedNameSource>,
    #[serde(default)]
    observances: Vec<DatedNameSource>,
    #[serde(default)]
    school_breaks: Vec<SchoolBreakSource>,
}

#[derive(Debug, Deserialize)]
struct DatedNameSource {
    date: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SchoolBreakSource {
    start: String,
    end: String,
    label: String,
}

/// Validated rule table ready to back an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleTable {
    pub year: i32,
    pub region: String,
    pub holidays: BTreeMap<NaiveDate, String>,
    pub observances: BTreeMap<NaiveDate, String>,
    /// `(start, end, label)` in declaration order.
    pub school_breaks: Vec<(NaiveDate, NaiveDate, String)>,
}

pub(crate) fn parse_rule_table(json: &str) -> Result<RuleTable, RuleTableError> {
    let source: RuleTableSource =
        serde_json::from_str(json).map_err(|err| RuleTableError::Malformed(err.to_string()))?;
    let year = source.year;

    let holidays = collect_exact_dates(HOLIDAY_TABLE, year, source.public_holidays)?;
    let observances = collect_exact_dates(OBSERVANCE_TABLE, year, source.observances)?;

    let mut school_breaks = Vec::with_capacity(source.school_breaks.len());
    for range in source.school_breaks {
        let start = parse_table_date(SCHOOL_BREAK_TABLE, year, &range.start)?;
        let end = parse_table_date(SCHOOL_BREAK_TABLE, year, &range.end)?;
        let label = range.label.trim().to_string();
        if label.is_empty() {
            return Err(RuleTableError::BlankName {
                table: SCHOOL_BREAK_TABLE,
                date: start,
            });
        }
        if start > end {
            return Err(RuleTableError::ReversedRange { label, start, end });
        }
        school_breaks.push((start, end, label));
    }

    Ok(RuleTable {
        year,
        region: source.region.trim().to_string(),
        holidays,
        observances,
        school_breaks,
    })
}

fn collect_exact_dates(
    table: &'static str,
    year: i32,
    rows: Vec<DatedNameSource>,
) -> Result<BTreeMap<NaiveDate, String>, RuleTableError> {
    let mut out = BTreeMap::new();
    for row in rows {
        let date = parse_table_date(table, year, &row.date)?;
        let name = row.name.trim().to_string();
        if name.is_empty() {
            return Err(RuleTableError::BlankName { table, date });
        }
        if out.insert(date, name).is_some() {
            return Err(RuleTableError::DuplicateDate { table, date });
        }
    }
    Ok(out)
}

fn parse_table_date(
    table: &'static str,
    year: i32,
    value: &str,
) -> Result<NaiveDate, RuleTableError> {
    let date = parse_date(value).ok_or_else(|| RuleTableError::InvalidDate {
        table,
        value: value.to_string(),
    })?;
    if date.year() != year {
        return Err(RuleTableError::OutOfYear { table, date, year });
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::{parse_rule_table, RuleTableError, BUILTIN_TABLE_JSON};

    #[test]
    fn builtin_table_is_valid() {
        let table = parse_rule_table(BUILTIN_TABLE_JSON).expect("bundled table should load");
        assert_eq!(table.year, 2026);
        assert_eq!(table.region, "Sarawak");
        assert_eq!(table.holidays.len(), 21);
        assert_eq!(table.observances.len(), 9);
        assert_eq!(table.school_breaks.len(), 4);
    }

    #[test]
    fn builtin_school_breaks_do_not_overlap() {
        let table = parse_rule_table(BUILTIN_TABLE_JSON).unwrap();
        for pair in table.school_breaks.windows(2) {
            assert!(pair[0].1 < pair[1].0, "{} overlaps {}", pair[0].2, pair[1].2);
        }
    }

    #[test]
    fn rejects_duplicate_date_within_one_table() {
        let json = r#"{
            "year": 2026,
            "observances": [
                {"date": "2026-04-05", "name": "Easter Sunday"},
                {"date": "2026-04-05", "name": "Qing Ming Jie"}
            ]
        }"#;
        let err = parse_rule_table(json).unwrap_err();
        assert!(matches!(
            err,
            RuleTableError::DuplicateDate { table: "observances", .. }
        ));
    }

    #[test]
    fn rejects_reversed_range() {
        let json = r#"{
            "year": 2026,
            "school_breaks": [
                {"start": "2026-03-29", "end": "2026-03-21", "label": "Cuti Penggal 1"}
            ]
        }"#;
        let err = parse_rule_table(json).unwrap_err();
        assert!(matches!(err, RuleTableError::ReversedRange { .. }));
    }

    #[test]
    fn rejects_dates_outside_declared_year() {
        let json = r#"{
            "year": 2026,
            "public_holidays": [{"date": "2027-01-01", "name": "New Year 2027"}]
        }"#;
        let err = parse_rule_table(json).unwrap_err();
        assert!(matches!(err, RuleTableError::OutOfYear { year: 2026, .. }));
    }

    #[test]
    fn rejects_unparsable_date_and_blank_name() {
        let bad_date =
            r#"{"year": 2026, "public_holidays": [{"date": "2026-13-01", "name": "x"}]}"#;
        assert!(matches!(
            parse_rule_table(bad_date).unwrap_err(),
            RuleTableError::InvalidDate { .. }
        ));

        let blank = r#"{"year": 2026, "observances": [{"date": "2026-05-16", "name": "  "}]}"#;
        assert!(matches!(
            parse_rule_table(blank).unwrap_err(),
            RuleTableError::BlankName { .. }
        ));
    }

    #[test]
    fn rejects_non_json_input() {
        assert!(matches!(
            parse_rule_table("not json").unwrap_err(),
            RuleTableError::Malformed(_)
        ));
    }
}
