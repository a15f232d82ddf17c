//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide get/put/update over named JSON blobs (`u`, `p`, `b`).
//! - Decode blobs leniently: a corrupt blob reads as absent.
//!
//! # Invariants
//! - `update_value` holds the database write lock from read to write, so two
//!   writers never lose each other's changes.
//! - A failing update closure leaves the stored blob untouched.

use crate::db::DbError;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key holding the serialized `Profile`.
pub const PROFILE_KEY: &str = "u";
/// Key holding the serialized date -> `PlanEntry` map.
pub const PLANS_KEY: &str = "p";
/// Key holding the serialized `BudgetEntry` list.
pub const BUDGET_KEY: &str = "b";

const KV_TABLE: &str = "kv_store";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for key-value persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    Serialization { key: String, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table: {table}"),
            Self::Serialization { key, message } => {
                write!(f, "failed to serialize value for key `{key}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::Serialization { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value surface holding one JSON blob per key.
pub trait KvStore {
    /// Reads the raw blob for `key`, `None` when never written.
    fn get_value(&self, key: &str) -> RepoResult<Option<String>>;

    /// Replaces the blob for `key` and persists before returning.
    fn put_value(&self, key: &str, value: &str) -> RepoResult<()>;

    /// Atomically loads the blob for `key`, lets `f` compute the replacement,
    /// and persists it. The second tuple element is handed back to the caller.
    ///
    /// Nothing is written when `f` returns an error.
    fn update_value<T, F>(&self, key: &str, f: F) -> RepoResult<T>
    where
        F: FnOnce(Option<String>) -> RepoResult<(String, T)>;
}

/// SQLite-backed key-value store over the `kv_store` table.
#[derive(Clone, Copy)]
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Constructs a store over a connection from `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable` when the schema was never created.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, KV_TABLE)? {
            return Err(RepoError::MissingRequiredTable(KV_TABLE));
        }
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKvStore<'_> {
    fn get_value(&self, key: &str) -> RepoResult<Option<String>> {
        read_value(self.conn, key)
    }

    fn put_value(&self, key: &str, value: &str) -> RepoResult<()> {
        write_value(self.conn, key, value)
    }

    fn update_value<T, F>(&self, key: &str, f: F) -> RepoResult<T>
    where
        F: FnOnce(Option<String>) -> RepoResult<(String, T)>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = read_value(&tx, key)?;
        let (next, output) = f(current)?;
        write_value(&tx, key, next.as_str())?;
        tx.commit()?;
        Ok(output)
    }
}

/// Decodes a stored blob, treating absence or corruption as the default.
///
/// Corrupt blobs are logged (without their content) and never fail startup.
pub fn decode_or_default<T>(key: &str, raw: Option<String>) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = raw else {
        return T::default();
    };

    match serde_json::from_str(raw.as_str()) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=kv_decode module=repo status=fallback key={} bytes={} error={}",
                key,
                raw.len(),
                err
            );
            T::default()
        }
    }
}

/// Encodes a value into its stored JSON blob.
pub fn encode<T: Serialize>(key: &str, value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|err| RepoError::Serialization {
        key: key.to_string(),
        message: err.to_string(),
    })
}

fn read_value(conn: &Connection, key: &str) -> RepoResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    Ok(value)
}

fn write_value(conn: &Connection, key: &str, value: &str) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![key, value],
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
