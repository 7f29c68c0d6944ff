//! Tests for option lists, option trees and raw statements.

mod common;
use common::*;

use oxide_admindb::{exec, option_array, option_tree, query_one, AdminDbError, FieldType, SqliteDriver, Value};
use oxide_admindb_core::Error;
use sqlx::SqliteConnection;

async fn categories(rows: &str) -> SqliteConnection {
    let mut conn = memory().await;
    let mut db = SqliteDriver::new(&mut conn);
    exec(
        &mut db,
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, title TEXT, depth INTEGER, pos INTEGER)",
    )
    .await
    .unwrap();
    exec(&mut db, &format!("INSERT INTO categories (id, title, depth, pos) VALUES {rows}"))
        .await
        .unwrap();
    drop(db);
    conn
}

const CATEGORY_QUERY: &str = "SELECT id, title, depth FROM categories ORDER BY pos";

#[tokio::test]
async fn option_array_ordered() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    let options = option_array(&mut db, "admingroups", "title", "id", Some("position"), None)
        .await
        .unwrap();
    assert_eq!(
        options,
        [
            (Value::Integer(2), String::from("Admins")),
            (Value::Integer(1), String::from("Editors")),
            (Value::Integer(3), String::from("Guests")),
        ]
    );
}

#[tokio::test]
async fn option_array_numeric_title() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    let options = option_array(&mut db, "admingroups", "position", "id", Some("id"), None)
        .await
        .unwrap();
    let titles: Vec<&str> = options.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(titles, ["2", "1", "3"]);
}

#[tokio::test]
async fn option_array_filtered() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    let options = option_array(
        &mut db,
        "adminusers",
        "username",
        "id",
        Some("username DESC"),
        Some("id > 2"),
    )
    .await
    .unwrap();
    let titles: Vec<&str> = options.iter().map(|(_, t)| t.as_str()).collect();
    assert_eq!(titles, ["dave", "carol"]);
}

#[tokio::test]
async fn option_tree_rebuilds_hierarchy() {
    let mut conn = categories(
        "(1, 'Hardware', 0, 1), (2, 'Disks', 1, 2), (4, 'SSD', 2, 3), \
         (3, 'Memory', 1, 4), (5, 'Software', 0, 5)",
    )
    .await;
    let mut db = SqliteDriver::new(&mut conn);

    let root = option_tree(&mut db, CATEGORY_QUERY, "id", "title", "depth", 0)
        .await
        .unwrap();

    assert_eq!(root.id, Value::Integer(0));
    assert_eq!(root.children.len(), 2);
    let hardware = root.child(&Value::Integer(1)).unwrap();
    let titles: Vec<&str> = hardware.children.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Disks", "Memory"]);
    let disks = hardware.child(&Value::Integer(2)).unwrap();
    assert_eq!(disks.children[0].title, "SSD");
    assert!(root.child(&Value::Integer(5)).unwrap().is_leaf());
    assert_eq!(root.descendants(), 5);
}

#[tokio::test]
async fn option_tree_with_base_level() {
    let mut conn = categories("(1, 'Top', 1, 1), (2, 'Nested', 2, 2), (3, 'Other', 1, 3)").await;
    let mut db = SqliteDriver::new(&mut conn);

    let root = option_tree(&mut db, CATEGORY_QUERY, "id", "title", "depth", 1)
        .await
        .unwrap();

    let depths: Vec<(usize, &str)> = root
        .walk()
        .map(|(depth, node)| (depth, node.title.as_str()))
        .collect();
    assert_eq!(depths, [(0, "Top"), (1, "Nested"), (0, "Other")]);
}

#[tokio::test]
async fn option_tree_rejects_level_skip() {
    let mut conn = categories("(1, 'Top', 0, 1), (2, 'Too deep', 2, 2)").await;
    let mut db = SqliteDriver::new(&mut conn);

    let err = option_tree(&mut db, CATEGORY_QUERY, "id", "title", "depth", 0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdminDbError::Core(Error::InvalidLevel { level: 2, .. })
    ));
}

#[tokio::test]
async fn option_tree_of_empty_result_is_bare_root() {
    let mut conn = categories("(1, 'Hidden', 0, 1)").await;
    let mut db = SqliteDriver::new(&mut conn);

    let root = option_tree(
        &mut db,
        "SELECT id, title, depth FROM categories WHERE id > 1",
        "id",
        "title",
        "depth",
        0,
    )
    .await
    .unwrap();
    assert!(root.is_leaf());
}

#[tokio::test]
async fn exec_reports_affected_rows() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    let count = exec(&mut db, "UPDATE adminusers SET enabled = 0 WHERE id < 3")
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn exec_reports_database_errors() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    let err = exec(&mut db, "DELETE FROM missing_table").await.unwrap_err();
    assert!(err.is_database());
}

#[tokio::test]
async fn query_one_scalar() {
    let mut conn = admin_schema().await;
    let mut db = SqliteDriver::new(&mut conn);

    assert_eq!(
        query_one(&mut db, "SELECT COUNT(*) FROM adminusers", FieldType::Integer)
            .await
            .unwrap(),
        Some(Value::Integer(4))
    );
    assert_eq!(
        query_one(&mut db, "SELECT username FROM adminusers WHERE id = 3", FieldType::Text)
            .await
            .unwrap(),
        Some(Value::from("carol"))
    );
    assert_eq!(
        query_one(&mut db, "SELECT username FROM adminusers WHERE id = 99", FieldType::Text)
            .await
            .unwrap(),
        None
    );
}
