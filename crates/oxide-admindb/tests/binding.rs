//! Tests for binding table synchronization.

mod common;
use common::*;

use oxide_admindb::{binding_query, binding_update, exec, BindingOutcome, BindingTable, SqliteDriver, Value};

fn group_users() -> BindingTable {
    BindingTable::new("admingroup_user", "groupnum", "usernum", "adminusers", "id").unwrap()
}

fn ids(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

#[tokio::test]
async fn binding_converges_to_desired_set() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);
    exec(
        &mut db,
        "INSERT INTO admingroup_user VALUES (1, 1), (1, 2), (2, 2)",
    )
    .await
    .unwrap();

    let outcome = binding_update(&mut db, &group_users(), 1, &ids(&[2, 3, 4]))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        BindingOutcome {
            inserted: 2,
            deleted: 1
        }
    );
    drop(db);

    assert_eq!(bound_users(&mut conn, 1).await, [2, 3, 4]);
    // Other owners are untouched.
    assert_eq!(bound_users(&mut conn, 2).await, [2]);
}

#[tokio::test]
async fn binding_is_idempotent() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    let first = binding_update(&mut db, &group_users(), 1, &ids(&[1, 3]))
        .await
        .unwrap();
    assert_eq!(first.inserted, 2);

    let second = binding_update(&mut db, &group_users(), 1, &ids(&[3, 1]))
        .await
        .unwrap();
    assert!(second.is_unchanged());
    drop(db);

    assert_eq!(bound_users(&mut conn, 1).await, [1, 3]);
}

#[tokio::test]
async fn binding_empty_set_clears_owner() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);
    exec(&mut db, "INSERT INTO admingroup_user VALUES (1, 1), (1, 2), (2, 3)")
        .await
        .unwrap();

    let outcome = binding_update(&mut db, &group_users(), 1, &[]).await.unwrap();
    assert_eq!(outcome.deleted, 2);
    drop(db);

    assert!(bound_users(&mut conn, 1).await.is_empty());
    assert_eq!(bound_users(&mut conn, 2).await, [3]);
}

#[tokio::test]
async fn binding_ignores_unknown_ids_and_duplicates() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    let outcome = binding_update(&mut db, &group_users(), 1, &ids(&[2, 2, 42]))
        .await
        .unwrap();
    assert_eq!(outcome.inserted, 1);
    drop(db);

    assert_eq!(bound_users(&mut conn, 1).await, [2]);
}

#[tokio::test]
async fn binding_failed_delete_rolls_back_insert() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);
    exec(&mut db, "INSERT INTO admingroup_user VALUES (1, 1)")
        .await
        .unwrap();
    exec(
        &mut db,
        "CREATE TRIGGER keep_bindings BEFORE DELETE ON admingroup_user \
         BEGIN SELECT RAISE(ABORT, 'bindings are locked'); END",
    )
    .await
    .unwrap();

    let err = binding_update(&mut db, &group_users(), 1, &ids(&[2, 3]))
        .await
        .unwrap_err();
    assert!(err.is_database());
    assert!(err.to_string().contains("bindings are locked"));
    drop(db);

    assert_eq!(bound_users(&mut conn, 1).await, [1]);
}

#[tokio::test]
async fn binding_failed_insert_leaves_table_unchanged() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);
    exec(&mut db, "INSERT INTO admingroup_user VALUES (1, 1), (1, 2)")
        .await
        .unwrap();
    exec(
        &mut db,
        "CREATE TRIGGER no_dave BEFORE INSERT ON admingroup_user \
         WHEN NEW.usernum = 4 BEGIN SELECT RAISE(ABORT, 'dave cannot join'); END",
    )
    .await
    .unwrap();

    let err = binding_update(&mut db, &group_users(), 1, &ids(&[3, 4]))
        .await
        .unwrap_err();
    assert!(err.is_database());

    // The connection is usable again once the transaction has been closed.
    let outcome = binding_update(&mut db, &group_users(), 1, &ids(&[1, 2]))
        .await
        .unwrap();
    assert!(outcome.is_unchanged());
    drop(db);

    assert_eq!(bound_users(&mut conn, 1).await, [1, 2]);
}

#[tokio::test]
async fn binding_insert_failure_skips_delete() {
    let mut db = RecordingDriver::failing_on("INSERT");

    let err = binding_update(&mut db, &group_users(), 1, &ids(&[1]))
        .await
        .unwrap_err();
    assert!(err.is_database());
    assert_eq!(db.statements.len(), 3);
    assert_eq!(db.statements[0], "BEGIN");
    assert!(db.statements[1].starts_with("INSERT INTO admingroup_user"));
    assert_eq!(db.statements[2], "ROLLBACK");
}

#[tokio::test]
async fn binding_commit_failure_rolls_back() {
    let mut db = RecordingDriver::failing_on("COMMIT");

    let err = binding_update(&mut db, &group_users(), 1, &ids(&[1]))
        .await
        .unwrap_err();
    assert!(err.is_database());
    assert_eq!(db.statements.last().map(String::as_str), Some("ROLLBACK"));
}

#[tokio::test]
async fn binding_rejects_mistyped_value_before_begin() {
    let mut db = RecordingDriver::new();

    let err = binding_update(&mut db, &group_users(), 1, &[Value::from("two")])
        .await
        .unwrap_err();
    assert!(!err.is_database());
    assert!(db.statements.is_empty());
}

#[tokio::test]
async fn binding_query_lists_values() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);
    binding_update(&mut db, &group_users(), 2, &ids(&[4, 1]))
        .await
        .unwrap();

    let mut values = binding_query(&mut db, &group_users(), 2).await.unwrap();
    values.sort_by_key(|v| v.as_i64());
    assert_eq!(values, ids(&[1, 4]));

    assert!(binding_query(&mut db, &group_users(), 3).await.unwrap().is_empty());
}
