//! Ordered schema steps for the planner database.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

/// `(version, sql)` pairs; versions are strictly increasing from 1.
const STEPS: &[(u32, &str)] = &[(1, include_str!("sql/0001_kv_store.sql"))];

/// Highest schema version this build can open.
pub fn supported_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Reads the schema version stamped on `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`supported_version`] in one write transaction.
///
/// # Errors
/// - `SchemaTooNew` when the database was stamped by a newer build; nothing
///   is modified in that case.
pub fn upgrade(conn: &mut Connection) -> DbResult<()> {
    let supported = supported_version();
    if schema_version(conn)? == supported {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    // Another connection may have upgraded while we waited for the lock.
    let found = schema_version(&tx)?;
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }
    for (version, sql) in STEPS.iter().filter(|(version, _)| *version > found) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    if found < supported {
        info!("event=db_upgrade module=db status=ok from={found} to={supported}");
    }
    Ok(())
}
