// SPDX-FileCopyrightText: 2026 udd-api contributors
// SPDX-License-Identifier: MIT

//! Smoke tests for udd-store-db.
//!
//! These tests verify the schema and basic operations work correctly
//! using in-memory and temporary on-disk databases.

use std::time::Duration;

use udd_store_db::{Error, OpenMode, PoolConfig, UddDb, Value};

/// Verify schema creation and empty queries work.
#[test]
fn test_schema_creation() {
    let db = UddDb::open_memory().unwrap();
    assert!(db.has_schema().unwrap());

    let rows = db
        .cursor()
        .unwrap()
        .fetch_all("SELECT * FROM bugs", &[])
        .unwrap();
    assert!(rows.is_empty());
}

/// Verify rows come back positionally with their storage types.
#[test]
fn test_insert_and_fetch() {
    let db = UddDb::open_memory().unwrap();
    db.insert(
        "popcon",
        &[
            "vim".into(),
            Value::Integer(120_000),
            Value::Integer(40_000),
            Value::Integer(60_000),
            Value::Integer(19_000),
            Value::Null,
        ],
    )
    .unwrap();

    let rows = db
        .cursor()
        .unwrap()
        .fetch_all("SELECT * FROM popcon WHERE package = ?1", &["vim".into()])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 6);
    assert_eq!(rows[0][0], Value::from("vim"));
    assert_eq!(rows[0][1], Value::Integer(120_000));
    assert!(rows[0][5].is_null());
}

/// String parameters compare against integer columns numerically.
#[test]
fn test_text_parameter_matches_integer_column() {
    let db = UddDb::open_memory().unwrap();
    db.insert("carnivore_login", &[Value::Integer(1026), "jamessan".into()])
        .unwrap();

    let rows = db
        .cursor()
        .unwrap()
        .fetch_all(
            "SELECT login FROM carnivore_login WHERE id = ?1",
            &["1026".into()],
        )
        .unwrap();
    assert_eq!(rows, vec![vec![Value::from("jamessan")]]);
}

/// Every cursor query is counted, failed ones included.
#[test]
fn test_query_count() {
    let db = UddDb::open_memory().unwrap();
    assert_eq!(db.query_count(), 0);

    db.cursor()
        .unwrap()
        .fetch_all("SELECT * FROM popcon", &[])
        .unwrap();
    let err = db
        .cursor()
        .unwrap()
        .fetch_all("SELECT * FROM no_such_table", &[])
        .unwrap_err();
    assert!(matches!(err, Error::Query { .. }));
    assert_eq!(db.query_count(), 2);
}

/// A failing query still returns its connection to the pool.
#[test]
fn test_cursor_released_on_error() {
    let config = PoolConfig {
        max_size: 1,
        acquire_timeout: Duration::from_millis(50),
        metrics: None,
    };
    let db = UddDb::open_memory_with(config).unwrap();

    for _ in 0..3 {
        assert!(
            db.cursor()
                .unwrap()
                .fetch_all("SELECT nope FROM bugs", &[])
                .is_err()
        );
    }
    let (_, active, capacity) = db.pool_stats();
    assert_eq!(active, 0);
    assert_eq!(capacity, 1);
}

/// Verify on-disk create and read-only reopen.
#[test]
fn test_open_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("udd.sqlite");

    assert!(matches!(
        UddDb::open(&path, OpenMode::ReadOnly, PoolConfig::default()),
        Err(Error::DatabaseNotFound(_))
    ));

    {
        let db = UddDb::open(&path, OpenMode::Create, PoolConfig::default()).unwrap();
        db.create_schema().unwrap();
        db.insert("bugs_tags", &[Value::Integer(24043), "patch".into()])
            .unwrap();
    }

    let db = UddDb::open(&path, OpenMode::ReadOnly, PoolConfig::default()).unwrap();
    assert!(db.has_schema().unwrap());
    let rows = db
        .cursor()
        .unwrap()
        .fetch_all("SELECT tag FROM bugs_tags WHERE id = ?1", &[Value::Integer(24043)])
        .unwrap();
    assert_eq!(rows, vec![vec![Value::from("patch")]]);
}
