//! Month view assembly for the calendar grid.
//!
//! Merges almanac facts with stored plans so the presentation layer can style
//! each cell without re-implementing lookup precedence.

use crate::almanac::AlmanacEngine;
use crate::model::almanac::AlmanacFact;
use crate::model::plan::PlanEntry;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// One day cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayView {
    pub date: NaiveDate,
    pub fact: AlmanacFact,
    pub plan: Option<PlanEntry>,
}

impl DayView {
    /// True when a plan marks this date as annual leave.
    pub fn is_leave(&self) -> bool {
        self.plan.as_ref().is_some_and(|plan| plan.is_leave)
    }
}

/// Days of one month plus the Sunday-first grid offset of the 1st.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st in a Sunday-first week row.
    pub leading_blanks: u32,
    pub days: Vec<DayView>,
}

/// Builds the view for `year`/`month`.
///
/// Returns `None` when `month` is not in `1..=12` or the year is out of
/// range for `NaiveDate`.
pub fn month_view(
    year: i32,
    month: u32,
    engine: &AlmanacEngine,
    plans: &BTreeMap<NaiveDate, PlanEntry>,
) -> Option<MonthView> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| DayView {
            date,
            fact: engine.lookup(date),
            plan: plans.get(&date).cloned(),
        })
        .collect();

    Some(MonthView {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}
