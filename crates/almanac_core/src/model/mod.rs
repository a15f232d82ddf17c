//! Domain model for almanac facts, user plans, profile and budget ledger.
//!
//! # Responsibility
//! - Define the canonical data structures used by core business logic.
//! - Own the serialized field names of persisted JSON blobs.
//!
//! # Invariants
//! - Every user-owned record is keyed or dated by a `NaiveDate`.
//! - `AlmanacFact` is derived per query and never persisted.

pub mod almanac;
pub mod budget;
pub mod date;
pub mod plan;
pub mod profile;
