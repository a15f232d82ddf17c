//! Core domain logic for the Almanac Sarawak 2026 planner.
//! This crate is the single source of truth for business invariants.

pub mod almanac;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use almanac::{lookup, AlmanacEngine, RuleTableError, SchoolBreak};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::almanac::AlmanacFact;
pub use model::budget::{BudgetEntry, BudgetValidationError};
pub use model::date::{format_date, parse_date};
pub use model::plan::PlanEntry;
pub use model::profile::{Profile, DEFAULT_ENTITLEMENT};
pub use repo::kv_repo::{KvStore, RepoError, RepoResult, SqliteKvStore};
pub use service::budget_service::{sum_amounts, BudgetError, BudgetLedger};
pub use service::calendar_service::{month_view, DayView, MonthView};
pub use service::export_service::{
    build_export, build_local_export, parse_plan_time, CalendarExport,
};
pub use service::leave_service::{
    current_leave_summary, leave_summary, remaining_leave, LeaveSummary,
};
pub use service::plan_service::PlanStore;
pub use service::profile_service::ProfileStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
