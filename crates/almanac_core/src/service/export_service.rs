//! Calendar export hand-off.
//!
//! # Responsibility
//! - Turn one dated plan into the payload the host platform's calendar
//!   insert action expects.
//!
//! # Invariants
//! - Time parsing never fails the export; anything unparsable starts at 09:00.
//! - Events always last exactly 60 minutes.

use crate::model::plan::PlanEntry;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Description attached to every exported event.
pub const EXPORT_DESCRIPTION: &str = "Scheduled via Almanac Sarawak 2026";
/// Fixed exported event length.
pub const EVENT_DURATION_MS: i64 = 3_600_000;

const FALLBACK_HOUR: u32 = 9;
const FALLBACK_MINUTE: u32 = 0;

/// Payload for the platform calendar insert action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarExport {
    /// Plan note.
    pub title: String,
    pub description: String,
    /// Wall-clock start in the export time zone.
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Unix epoch milliseconds of `start`.
    pub start_epoch_ms: i64,
    /// Always `start_epoch_ms + EVENT_DURATION_MS`.
    pub end_epoch_ms: i64,
    /// Set when the plan time could not be parsed and 09:00 was used.
    pub used_fallback_time: bool,
}

/// Parses a user-typed `HH:MM` time.
///
/// The hour is the text before the first `:`; the minute is the digits found
/// in the text between the first and second `:` (so `"14:30pm"` reads as
/// 14:30). Returns `None` for a missing colon, non-numeric parts or an
/// out-of-range hour/minute.
pub fn parse_plan_time(text: &str) -> Option<NaiveTime> {
    let mut parts = text.trim().split(':');
    let hour = parts.next()?.trim().parse::<u32>().ok()?;
    let minute_digits: String = parts
        .next()?
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .collect();
    let minute = minute_digits.parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Builds the export payload with epoch timestamps resolved in `tz`.
///
/// Ambiguous local times resolve to the earlier instant; local times skipped
/// by a transition are read as UTC.
pub fn build_export<Tz: TimeZone>(date: NaiveDate, plan: &PlanEntry, tz: &Tz) -> CalendarExport {
    let parsed = plan.time().and_then(parse_plan_time);
    let used_fallback_time = parsed.is_none();
    let time = parsed.unwrap_or_else(fallback_time);

    let start = date.and_time(time);
    let start_epoch_ms = tz
        .from_local_datetime(&start)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&start))
        .timestamp_millis();

    CalendarExport {
        title: plan.note.clone(),
        description: EXPORT_DESCRIPTION.to_string(),
        start,
        end: start + Duration::milliseconds(EVENT_DURATION_MS),
        start_epoch_ms,
        end_epoch_ms: start_epoch_ms + EVENT_DURATION_MS,
        used_fallback_time,
    }
}

/// Builds the export payload in the device's local time zone.
pub fn build_local_export(date: NaiveDate, plan: &PlanEntry) -> CalendarExport {
    build_export(date, plan, &Local)
}

fn fallback_time() -> NaiveTime {
    NaiveTime::from_hms_opt(FALLBACK_HOUR, FALLBACK_MINUTE, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::{build_export, parse_plan_time, EVENT_DURATION_MS, EXPORT_DESCRIPTION};
    use crate::model::plan::PlanEntry;
    use chrono::{FixedOffset, NaiveDate, NaiveTime, Timelike, Utc};

    fn hm(hour: u32, minute: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    #[test]
    fn parses_plain_and_loose_times() {
        assert_eq!(parse_plan_time("14:30"), hm(14, 30));
        assert_eq!(parse_plan_time("9:5"), hm(9, 5));
        assert_eq!(parse_plan_time(" 07:45 "), hm(7, 45));
        assert_eq!(parse_plan_time("14:30pm"), hm(14, 30));
        assert_eq!(parse_plan_time("14:30:59"), hm(14, 30));
    }

    #[test]
    fn rejects_malformed_times() {
        assert_eq!(parse_plan_time("not-a-time"), None);
        assert_eq!(parse_plan_time("1430"), None);
        assert_eq!(parse_plan_time(""), None);
        assert_eq!(parse_plan_time("24:00"), None);
        assert_eq!(parse_plan_time("12:60"), None);
        assert_eq!(parse_plan_time("ab:30"), None);
        assert_eq!(parse_plan_time("12:xx"), None);
    }

    #[test]
    fn unparsable_time_falls_back_to_nine() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let export = build_export(date, &PlanEntry::new("meet").with_time("not-a-time"), &Utc);
        assert!(export.used_fallback_time);
        assert_eq!((export.start.hour(), export.start.minute()), (9, 0));
    }

    #[test]
    fn parsed_time_is_used_exactly() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let plan = PlanEntry::new("dentist").with_time("14:30");
        let export = build_export(date, &plan, &Utc);
        assert!(!export.used_fallback_time);
        assert_eq!((export.start.hour(), export.start.minute()), (14, 30));
        assert_eq!(export.title, "dentist");
        assert_eq!(export.description, EXPORT_DESCRIPTION);
    }

    #[test]
    fn epoch_range_is_one_hour_in_given_zone() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let kuching = FixedOffset::east_opt(8 * 3600).unwrap();
        let export = build_export(date, &PlanEntry::new("x").with_time("08:00"), &kuching);
        // 2026-01-01T00:00:00Z
        assert_eq!(export.start_epoch_ms, 1_767_225_600_000);
        assert_eq!(export.end_epoch_ms - export.start_epoch_ms, EVENT_DURATION_MS);
        assert_eq!((export.end.hour(), export.end.minute()), (9, 0));
    }
}
