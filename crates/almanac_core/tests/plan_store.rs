use almanac_core::db::{open_db, open_db_in_memory};
use almanac_core::{KvStore, PlanEntry, PlanStore, SqliteKvStore};
use chrono::NaiveDate;

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

#[test]
fn upsert_then_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());

    let entry = PlanEntry::new("Dentist").with_time("14:30");
    plans.upsert(d(4, 7), entry.clone()).unwrap();

    assert_eq!(plans.get(d(4, 7)).unwrap(), Some(entry));
    assert_eq!(plans.get(d(4, 8)).unwrap(), None);
}

#[test]
fn upsert_replaces_existing_entry() {
    let conn = open_db_in_memory().unwrap();
    let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());

    plans.upsert(d(4, 7), PlanEntry::new("draft")).unwrap();
    plans
        .upsert(d(4, 7), PlanEntry::new("Trip to Miri").as_leave())
        .unwrap();

    let loaded = plans.get(d(4, 7)).unwrap().unwrap();
    assert_eq!(loaded.note, "Trip to Miri");
    assert!(loaded.is_leave);
    assert_eq!(plans.list_all().unwrap().len(), 1);
}

#[test]
fn blank_note_upsert_deletes_entry() {
    let conn = open_db_in_memory().unwrap();
    let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());

    plans.upsert(d(5, 2), PlanEntry::new("market")).unwrap();
    plans.upsert(d(5, 2), PlanEntry::new("")).unwrap();
    assert_eq!(plans.get(d(5, 2)).unwrap(), None);

    plans.upsert(d(5, 3), PlanEntry::new("   ").as_leave()).unwrap();
    assert_eq!(plans.get(d(5, 3)).unwrap(), None);
    assert!(plans.list_all().unwrap().is_empty());
}

#[test]
fn delete_is_noop_when_absent() {
    let conn = open_db_in_memory().unwrap();
    let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());

    plans.delete(d(6, 6)).unwrap();
    plans.upsert(d(6, 7), PlanEntry::new("keep")).unwrap();
    plans.delete(d(6, 6)).unwrap();

    assert_eq!(plans.list_all().unwrap().len(), 1);
}

#[test]
fn itinerary_is_sorted_ascending() {
    let conn = open_db_in_memory().unwrap();
    let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());

    plans.upsert(d(12, 1), PlanEntry::new("c")).unwrap();
    plans.upsert(d(1, 9), PlanEntry::new("a")).unwrap();
    plans.upsert(d(6, 15), PlanEntry::new("b")).unwrap();

    let notes: Vec<String> = plans
        .itinerary()
        .unwrap()
        .into_iter()
        .map(|(_, entry)| entry.note)
        .collect();
    assert_eq!(notes, vec!["a", "b", "c"]);
}

#[test]
fn persisted_blob_uses_date_keys_and_legacy_field_names() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let plans = PlanStore::new(store);

    plans
        .upsert(d(2, 17), PlanEntry::new("Reunion dinner").with_time("19:00").as_leave())
        .unwrap();

    let raw = store.get_value("p").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "2026-02-17": {"note": "Reunion dinner", "time": "19:00", "isLeave": true}
        })
    );
}

#[test]
fn corrupt_blob_reads_as_empty_and_is_recoverable() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    store.put_value("p", "{\"2026-01-01\": [broken").unwrap();

    let plans = PlanStore::new(store);
    assert!(plans.list_all().unwrap().is_empty());

    plans.upsert(d(1, 10), PlanEntry::new("fresh start")).unwrap();
    assert_eq!(plans.list_all().unwrap().len(), 1);
}

#[test]
fn mutations_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plans.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());
        plans.upsert(d(7, 22), PlanEntry::new("Sarawak Day parade")).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());
    assert_eq!(
        plans.get(d(7, 22)).unwrap().map(|entry| entry.note),
        Some("Sarawak Day parade".to_string())
    );
}

#[test]
fn concurrent_connections_do_not_lose_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.sqlite3");
    drop(open_db(&path).unwrap());

    let handles: Vec<_> = (1..=8u32)
        .map(|day| {
            let path = path.clone();
            std::thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());
                plans
                    .upsert(d(9, day), PlanEntry::new(format!("day {day}")))
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let plans = PlanStore::new(SqliteKvStore::try_new(&conn).unwrap());
    assert_eq!(plans.list_all().unwrap().len(), 8);
}
