//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value persistence contract used by every store.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Whole-blob read-modify-write happens inside one write transaction.
//! - Write failures are returned to callers, never swallowed.

pub mod kv_repo;
