use almanac_core::db::schema::{schema_version, supported_version};
use almanac_core::db::{open_db, open_db_in_memory, DbError};
use almanac_core::{KvStore, RepoError, SqliteKvStore};
use rusqlite::Connection;

#[test]
fn in_memory_database_is_at_supported_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), supported_version());
    assert!(SqliteKvStore::try_new(&conn).is_ok());
}

#[test]
fn reopening_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("almanac.sqlite3");

    let conn_first = open_db(&path).unwrap();
    SqliteKvStore::try_new(&conn_first)
        .unwrap()
        .put_value("u", r#"{"entitlement":20}"#)
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), supported_version());
    let value = SqliteKvStore::try_new(&conn_second)
        .unwrap()
        .get_value("u")
        .unwrap();
    assert_eq!(value.as_deref(), Some(r#"{"entitlement":20}"#));
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, supported_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_rejects_connection_without_schema() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKvStore::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("kv_store")));
}
