//! Almanac lookup engine.
//!
//! # Responsibility
//! - Answer `lookup(date)` from a validated, immutable rule table.
//! - Provide the process-wide engine for the bundled Sarawak 2026 table.
//!
//! # Invariants
//! - `lookup` never fails and has no side effects.
//! - An exact-date entry is never overridden by a school-break range.
//! - When ranges overlap, the first declared range wins.

use crate::almanac::table::{parse_rule_table, RuleTableError, BUILTIN_TABLE_JSON};
use crate::model::almanac::AlmanacFact;
use chrono::NaiveDate;
use log::info;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static BUILTIN_ENGINE: Lazy<AlmanacEngine> = Lazy::new(|| {
    AlmanacEngine::from_json(BUILTIN_TABLE_JSON).expect("bundled almanac table is valid")
});

/// Closed date interval labeled with a school-break name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolBreak {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl SchoolBreak {
    /// Returns whether `date` falls inside the inclusive interval.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Immutable holiday/observance/school-break lookup for one table release.
#[derive(Debug, Clone)]
pub struct AlmanacEngine {
    year: i32,
    region: String,
    holidays: BTreeMap<NaiveDate, String>,
    observances: BTreeMap<NaiveDate, String>,
    school_breaks: Vec<SchoolBreak>,
}

impl AlmanacEngine {
    /// Loads and validates a JSON rule table.
    ///
    /// # Errors
    /// - Returns `RuleTableError` for malformed JSON, invalid or out-of-year
    ///   dates, blank names, reversed ranges or duplicate dates within one
    ///   exact-date table.
    pub fn from_json(json: &str) -> Result<Self, RuleTableError> {
        let table = parse_rule_table(json)?;
        info!(
            "event=almanac_load module=almanac status=ok year={} holidays={} observances={} school_breaks={}",
            table.year,
            table.holidays.len(),
            table.observances.len(),
            table.school_breaks.len()
        );

        Ok(Self {
            year: table.year,
            region: table.region,
            holidays: table.holidays,
            observances: table.observances,
            school_breaks: table
                .school_breaks
                .into_iter()
                .map(|(start, end, label)| SchoolBreak { start, end, label })
                .collect(),
        })
    }

    /// Returns the engine backed by the bundled Sarawak 2026 table.
    pub fn builtin() -> &'static AlmanacEngine {
        &BUILTIN_ENGINE
    }

    /// Returns the almanac fact for `date`.
    ///
    /// Precedence: public holiday name, then observance remark at the exact
    /// date, then the label of the first school break containing the date.
    pub fn lookup(&self, date: NaiveDate) -> AlmanacFact {
        if let Some(name) = self.holidays.get(&date) {
            return AlmanacFact::public_holiday(name.as_str());
        }
        if let Some(remark) = self.observances.get(&date) {
            return AlmanacFact::remark(remark.as_str());
        }

        self.school_breaks
            .iter()
            .find(|range| range.contains(date))
            .map_or_else(AlmanacFact::empty, |range| {
                AlmanacFact::remark(range.label.as_str())
            })
    }

    pub fn is_public_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    /// Calendar year this table was curated for.
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Public holidays in ascending date order.
    pub fn holidays(&self) -> impl Iterator<Item = (NaiveDate, &str)> + '_ {
        self.holidays
            .iter()
            .map(|(date, name)| (*date, name.as_str()))
    }

    pub fn school_breaks(&self) -> &[SchoolBreak] {
        &self.school_breaks
    }
}

/// Looks up `date` in the bundled Sarawak 2026 table.
pub fn lookup(date: NaiveDate) -> AlmanacFact {
    AlmanacEngine::builtin().lookup(date)
}
