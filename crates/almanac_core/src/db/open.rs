//! Connection setup for the planner database.

use super::schema::upgrade;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the planner database at `path`.
///
/// The returned connection has its schema upgraded and waits up to five
/// seconds for competing writers.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    connect("file", || {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        // Readers keep working while another connection holds the write lock.
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Ok(conn)
    })
}

/// Opens a private in-memory planner database, mainly for tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    connect("memory", Connection::open_in_memory)
}

fn connect(
    location: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = open().map_err(DbError::from).and_then(|mut conn| -> DbResult<Connection> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        upgrade(&mut conn)?;
        Ok(conn)
    });
    let elapsed_ms = started_at.elapsed().as_millis();

    match &result {
        Ok(_) => info!("event=db_open module=db status=ok location={location} elapsed_ms={elapsed_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error location={location} elapsed_ms={elapsed_ms} error={err}"
        ),
    }
    result
}
