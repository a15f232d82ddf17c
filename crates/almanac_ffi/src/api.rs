//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate dates to/from canonical `YYYY-MM-DD` strings at the boundary.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in response envelopes (`ok=false` + message),
//!   never silently dropped.

use almanac_core::db::open_db;
use almanac_core::{
    build_local_export, core_version as core_version_inner, current_leave_summary, format_date,
    init_logging as init_logging_inner, month_view as month_view_inner, parse_date,
    ping as ping_inner, sum_amounts, AlmanacEngine, BudgetEntry, BudgetLedger, PlanEntry,
    PlanStore, Profile, ProfileStore, SqliteKvStore,
};
use chrono::{Datelike, Local, NaiveDate};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "almanac_sarawak_2026.sqlite3";
#[cfg_attr(test, allow(dead_code))]
const DB_PATH_ENV: &str = "ALMANAC_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Almanac fact for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlmanacDayItem {
    pub date: String,
    pub is_public_holiday: bool,
    pub remark: Option<String>,
}

/// Stored plan for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanItem {
    pub date: String,
    pub note: String,
    pub time: String,
    pub is_leave: bool,
}

/// One expense line.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetItem {
    pub id: i64,
    pub item: String,
    pub amount: f64,
    pub date: String,
}

/// Month grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDayItem {
    pub date: String,
    pub day: u32,
    pub is_public_holiday: bool,
    pub remark: Option<String>,
    pub has_plan: bool,
    pub is_leave: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayItem {
    pub date: String,
    pub name: String,
}

/// Inclusive school-break range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolBreakItem {
    pub start: String,
    pub end: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlmanacOverviewResponse {
    pub year: i32,
    pub region: String,
    /// Ascending by date.
    pub holidays: Vec<HolidayItem>,
    /// Table order.
    pub school_breaks: Vec<SchoolBreakItem>,
}

/// Generic action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlmanacLookupResponse {
    pub ok: bool,
    pub item: Option<AlmanacDayItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanGetResponse {
    pub ok: bool,
    /// `None` when the date has no plan.
    pub item: Option<PlanItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanListResponse {
    pub ok: bool,
    /// Ascending by date.
    pub items: Vec<PlanItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub entitlement: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveBalanceResponse {
    pub ok: bool,
    pub entitlement: u32,
    pub used: u32,
    /// Negative when more leave is booked than granted.
    pub remaining: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetListResponse {
    pub ok: bool,
    /// Most recent first.
    pub items: Vec<BudgetItem>,
    pub total: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetTotalResponse {
    pub ok: bool,
    pub total: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAddResponse {
    pub ok: bool,
    pub item: Option<BudgetItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarExportResponse {
    pub ok: bool,
    pub title: String,
    pub description: String,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthViewResponse {
    pub ok: bool,
    /// Empty cells before the 1st in a Sunday-first row.
    pub leading_blanks: u32,
    pub days: Vec<MonthDayItem>,
    pub message: String,
}

/// Looks up holiday/observance/school-break facts for `date` (`YYYY-MM-DD`).
///
/// # FFI contract
/// - Sync call, pure in-memory lookup, no DB access.
#[flutter_rust_bridge::frb(sync)]
pub fn almanac_lookup(date: String) -> AlmanacLookupResponse {
    match parse_ffi_date(date.as_str()) {
        Ok(day) => {
            let fact = AlmanacEngine::builtin().lookup(day);
            AlmanacLookupResponse {
                ok: true,
                item: Some(AlmanacDayItem {
                    date: format_date(day),
                    is_public_holiday: fact.is_public_holiday,
                    remark: fact.remark,
                }),
                message: String::new(),
            }
        }
        Err(message) => AlmanacLookupResponse {
            ok: false,
            item: None,
            message,
        },
    }
}

/// Public holidays and school breaks of the bundled table, for list screens.
#[flutter_rust_bridge::frb(sync)]
pub fn almanac_overview() -> AlmanacOverviewResponse {
    let engine = AlmanacEngine::builtin();
    AlmanacOverviewResponse {
        year: engine.year(),
        region: engine.region().to_string(),
        holidays: engine
            .holidays()
            .map(|(date, name)| HolidayItem {
                date: format_date(date),
                name: name.to_string(),
            })
            .collect(),
        school_breaks: engine
            .school_breaks()
            .iter()
            .map(|range| SchoolBreakItem {
                start: format_date(range.start),
                end: format_date(range.end),
                label: range.label.clone(),
            })
            .collect(),
    }
}

/// Gets the plan stored for `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_get(date: String) -> PlanGetResponse {
    let result = parse_ffi_date(date.as_str()).and_then(|day| {
        with_kv_store("plan_get", |store| PlanStore::new(store).get(day))
            .map(|entry| entry.map(|entry| to_plan_item(day, entry)))
    });
    match result {
        Ok(item) => PlanGetResponse {
            ok: true,
            item,
            message: String::new(),
        },
        Err(message) => PlanGetResponse {
            ok: false,
            item: None,
            message,
        },
    }
}

/// Saves a plan for `date`; a blank `note` deletes it.
///
/// # FFI contract
/// - Sync call, DB-backed; returns only after the write is durable.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_upsert(date: String, note: String, time: String, is_leave: bool) -> ActionResponse {
    let entry = PlanEntry {
        note: note.trim().to_string(),
        time: time.trim().to_string(),
        is_leave,
    };
    let deleting = entry.is_blank();
    let result = parse_ffi_date(date.as_str()).and_then(|day| {
        with_kv_store("plan_upsert", |store| PlanStore::new(store).upsert(day, entry))
    });
    match result {
        Ok(()) if deleting => ActionResponse::success("Plan removed."),
        Ok(()) => ActionResponse::success("Plan saved."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Removes the plan for `date`. Absent plans are not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_delete(date: String) -> ActionResponse {
    let result = parse_ffi_date(date.as_str()).and_then(|day| {
        with_kv_store("plan_delete", |store| PlanStore::new(store).delete(day))
    });
    match result {
        Ok(()) => ActionResponse::success("Plan removed."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Lists every plan in ascending date order (itinerary view).
#[flutter_rust_bridge::frb(sync)]
pub fn plan_list() -> PlanListResponse {
    match with_kv_store("plan_list", |store| PlanStore::new(store).itinerary()) {
        Ok(plans) => {
            let items = plans
                .into_iter()
                .map(|(day, entry)| to_plan_item(day, entry))
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No plans recorded.".to_string()
            } else {
                format!("{} plan(s).", items.len())
            };
            PlanListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(message) => PlanListResponse {
            ok: false,
            items: Vec::new(),
            message,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_get() -> ProfileResponse {
    to_profile_response(with_kv_store("profile_get", |store| {
        ProfileStore::new(store).get()
    }))
}

/// Stores the entitlement typed in settings; non-numeric text stores `0`.
#[flutter_rust_bridge::frb(sync)]
pub fn profile_set_entitlement(text: String) -> ProfileResponse {
    to_profile_response(with_kv_store("profile_set_entitlement", |store| {
        ProfileStore::new(store).set_entitlement_from_input(text.as_str())
    }))
}

/// Current leave balance, recomputed from the latest plans.
#[flutter_rust_bridge::frb(sync)]
pub fn leave_balance() -> LeaveBalanceResponse {
    let result = with_kv_store("leave_balance", |store| {
        current_leave_summary(&ProfileStore::new(store), &PlanStore::new(store))
    });
    match result {
        Ok(summary) => LeaveBalanceResponse {
            ok: true,
            entitlement: summary.entitlement,
            used: summary.used,
            remaining: summary.remaining,
            message: String::new(),
        },
        Err(message) => LeaveBalanceResponse {
            ok: false,
            entitlement: 0,
            used: 0,
            remaining: 0,
            message,
        },
    }
}

/// Lists expenses (most recent first) with their total.
#[flutter_rust_bridge::frb(sync)]
pub fn budget_list() -> BudgetListResponse {
    match with_kv_store("budget_list", |store| BudgetLedger::new(store).list()) {
        Ok(entries) => BudgetListResponse {
            ok: true,
            total: sum_amounts(&entries),
            items: entries.into_iter().map(to_budget_item).collect(),
            message: String::new(),
        },
        Err(message) => BudgetListResponse {
            ok: false,
            items: Vec::new(),
            total: 0.0,
            message,
        },
    }
}

/// Sum of all expense amounts.
#[flutter_rust_bridge::frb(sync)]
pub fn budget_total() -> BudgetTotalResponse {
    match with_kv_store("budget_total", |store| BudgetLedger::new(store).total()) {
        Ok(total) => BudgetTotalResponse {
            ok: true,
            total,
            message: String::new(),
        },
        Err(message) => BudgetTotalResponse {
            ok: false,
            total: 0.0,
            message,
        },
    }
}

/// Adds an expense dated today from raw form input.
///
/// # FFI contract
/// - Rejects blank `item` or non-numeric `amount` without creating an entry.
#[flutter_rust_bridge::frb(sync)]
pub fn budget_add(item: String, amount: String) -> BudgetAddResponse {
    let today = Local::now().date_naive();
    let result = with_kv_store("budget_add", |store| {
        BudgetLedger::new(store).add_from_input(item.as_str(), amount.as_str(), today)
    });
    match result {
        Ok(entry) => BudgetAddResponse {
            ok: true,
            item: Some(to_budget_item(entry)),
            message: "Entry added.".to_string(),
        },
        Err(message) => BudgetAddResponse {
            ok: false,
            item: None,
            message,
        },
    }
}

/// Administrative reset: removes every expense.
#[flutter_rust_bridge::frb(sync)]
pub fn budget_clear() -> ActionResponse {
    let result = with_kv_store("budget_clear", |store| {
        BudgetLedger::new(store).replace_all(Vec::new())
    });
    match result {
        Ok(()) => ActionResponse::success("Budget cleared."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Builds the calendar-insert payload for the plan stored on `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_export(date: String) -> CalendarExportResponse {
    let result = parse_ffi_date(date.as_str()).and_then(|day| {
        let entry = with_kv_store("calendar_export", |store| PlanStore::new(store).get(day))?;
        entry
            .map(|entry| build_local_export(day, &entry))
            .ok_or_else(|| format!("no plan stored for {}", format_date(day)))
    });
    match result {
        Ok(export) => CalendarExportResponse {
            ok: true,
            title: export.title,
            description: export.description,
            start_epoch_ms: export.start_epoch_ms,
            end_epoch_ms: export.end_epoch_ms,
            message: String::new(),
        },
        Err(message) => CalendarExportResponse {
            ok: false,
            title: String::new(),
            description: String::new(),
            start_epoch_ms: 0,
            end_epoch_ms: 0,
            message,
        },
    }
}

/// Month grid cells for `year`/`month` with facts and plan markers.
#[flutter_rust_bridge::frb(sync)]
pub fn month_view(year: i32, month: u32) -> MonthViewResponse {
    let result = with_kv_store("month_view", |store| PlanStore::new(store).list_all())
        .and_then(|plans| {
            month_view_inner(year, month, AlmanacEngine::builtin(), &plans)
                .ok_or_else(|| format!("invalid month {year}-{month}"))
        });
    match result {
        Ok(view) => MonthViewResponse {
            ok: true,
            leading_blanks: view.leading_blanks,
            days: view
                .days
                .into_iter()
                .map(|day| MonthDayItem {
                    date: format_date(day.date),
                    day: day.date.day(),
                    is_public_holiday: day.fact.is_public_holiday,
                    is_leave: day.is_leave(),
                    has_plan: day.plan.is_some(),
                    remark: day.fact.remark,
                })
                .collect(),
            message: String::new(),
        },
        Err(message) => MonthViewResponse {
            ok: false,
            leading_blanks: 0,
            days: Vec::new(),
            message,
        },
    }
}

fn parse_ffi_date(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("invalid date `{}`; expected YYYY-MM-DD", value.trim()))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH.get_or_init(default_db_path).clone()
}

#[cfg(not(test))]
fn default_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

/// Unit tests get a private database that is removed with the temp dir.
#[cfg(test)]
fn default_db_path() -> PathBuf {
    static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    TEST_DB_DIR
        .get_or_init(|| tempfile::tempdir().expect("test db dir"))
        .path()
        .join(DB_FILE_NAME)
}

fn with_kv_store<T, E: std::fmt::Display>(
    op: &'static str,
    f: impl FnOnce(SqliteKvStore<'_>) -> Result<T, E>,
) -> Result<T, String> {
    let conn =
        open_db(resolve_db_path()).map_err(|err| report(op, format!("DB open failed: {err}")))?;
    let store = SqliteKvStore::try_new(&conn).map_err(|err| report(op, err))?;
    f(store).map_err(|err| report(op, err))
}

fn report(op: &'static str, err: impl std::fmt::Display) -> String {
    warn!("event=ffi_call module=ffi status=error op={op} error={err}");
    format!("{op} failed: {err}")
}

fn to_profile_response(result: Result<Profile, String>) -> ProfileResponse {
    match result {
        Ok(profile) => ProfileResponse {
            ok: true,
            entitlement: profile.entitlement,
            message: String::new(),
        },
        Err(message) => ProfileResponse {
            ok: false,
            entitlement: 0,
            message,
        },
    }
}

fn to_plan_item(date: NaiveDate, entry: PlanEntry) -> PlanItem {
    PlanItem {
        date: format_date(date),
        note: entry.note,
        time: entry.time,
        is_leave: entry.is_leave,
    }
}

fn to_budget_item(entry: BudgetEntry) -> BudgetItem {
    BudgetItem {
        id: entry.id,
        item: entry.item,
        amount: entry.amount,
        date: format_date(entry.date),
    }
}
