#![allow(dead_code)]

use futures::future::BoxFuture;
use oxide_admindb::{AdminDbError, Driver, FieldSpec, Record, Result};
use oxide_admindb_core::{Dialect, GenericDialect};
use sqlx::{Connection, SqliteConnection};

/// Opens a fresh in-memory database.
pub async fn memory() -> SqliteConnection {
    SqliteConnection::connect("sqlite::memory:")
        .await
        .unwrap_or_else(|e| panic!("Failed to open in-memory database: {e}"))
}

/// Opens an in-memory database holding the admin user and group tables.
pub async fn admin_schema() -> SqliteConnection {
    let mut conn = memory().await;
    for sql in [
        "CREATE TABLE adminusers (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            enabled BOOLEAN NOT NULL DEFAULT 1,
            rating REAL,
            born DATE,
            alarm TIME,
            created DATETIME
        )",
        "CREATE TABLE admingroups (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0
        )",
        "CREATE TABLE admingroup_user (
            groupnum INTEGER NOT NULL,
            usernum INTEGER NOT NULL,
            PRIMARY KEY (groupnum, usernum)
        )",
        "INSERT INTO adminusers (id, username) VALUES (1, 'alice'), (2, 'bob'), (3, 'carol'), (4, 'dave')",
        "INSERT INTO admingroups (id, title, position) VALUES (1, 'Editors', 2), (2, 'Admins', 1), (3, 'Guests', 3)",
    ] {
        sqlx::query(sql)
            .execute(&mut conn)
            .await
            .unwrap_or_else(|e| panic!("Failed to run: {sql}\nError: {e}"));
    }
    conn
}

/// Returns the stored bindings of one group, sorted.
pub async fn bound_users(conn: &mut SqliteConnection, group: i64) -> Vec<i64> {
    sqlx::query_scalar("SELECT usernum FROM admingroup_user WHERE groupnum = ? ORDER BY usernum")
        .bind(group)
        .fetch_all(conn)
        .await
        .unwrap_or_else(|e| panic!("Failed to read bindings: {e}"))
}

/// A driver that records statements instead of running them.
///
/// Every statement containing `fail_on` fails with a database error.
/// Queries return `rows`.
#[derive(Default)]
pub struct RecordingDriver {
    dialect: GenericDialect,
    pub statements: Vec<String>,
    pub fail_on: Option<String>,
    pub rows: Vec<Record>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(pattern: &str) -> Self {
        Self {
            fail_on: Some(pattern.to_string()),
            ..Self::default()
        }
    }

    pub fn returning(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    fn record(&mut self, sql: &str) -> Result<()> {
        self.statements.push(sql.to_string());
        match &self.fail_on {
            Some(pattern) if sql.contains(pattern.as_str()) => {
                Err(AdminDbError::database(format!("injected failure on: {sql}")))
            }
            _ => Ok(()),
        }
    }
}

impl Driver for RecordingDriver {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<u64>> {
        Box::pin(async move {
            self.record(sql)?;
            Ok(1)
        })
    }

    fn query<'a>(
        &'a mut self,
        sql: &'a str,
        _fields: &'a [FieldSpec],
    ) -> BoxFuture<'a, Result<Vec<Record>>> {
        Box::pin(async move {
            self.record(sql)?;
            Ok(self.rows.clone())
        })
    }

    fn begin(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { self.record("BEGIN") })
    }

    fn commit(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { self.record("COMMIT") })
    }

    fn rollback(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move { self.record("ROLLBACK") })
    }
}
