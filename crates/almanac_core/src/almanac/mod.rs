//! Almanac lookup engine and its rule tables.
//!
//! # Responsibility
//! - Map any calendar date to its public holiday / observance / school-break
//!   fact.
//! - Keep the hand-curated rule data in an auditable data file, separate from
//!   lookup logic.
//!
//! # Invariants
//! - Lookup is total, pure and deterministic for one release of the table.
//! - Precedence is holiday name > observance remark > school-break label.
//! - `is_public_holiday` is set only by exact public holiday keys.

pub mod engine;
pub mod table;

pub use engine::{lookup, AlmanacEngine, SchoolBreak};
pub use table::RuleTableError;
