//! SQLite driver backed by sqlx.

use futures::future::BoxFuture;
use oxide_admindb_core::{Dialect, FieldSpec, FieldType, Record, SqliteDialect, Value};
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Row, TypeInfo, ValueRef};
use tracing::debug;

use crate::driver::Driver;
use crate::error::Result;

/// A [`Driver`] over a caller-owned SQLite connection.
///
/// ```ignore
/// use sqlx::{Connection, SqliteConnection};
/// use oxide_admindb::{fetch_row, SqliteDriver};
///
/// let mut conn = SqliteConnection::connect("sqlite:admin.db").await?;
/// let mut db = SqliteDriver::new(&mut conn);
/// let row = fetch_row(&mut db, "admingroups", &["title"], "id", 1).await?;
/// ```
pub struct SqliteDriver<'c> {
    conn: &'c mut SqliteConnection,
    dialect: SqliteDialect,
}

impl<'c> SqliteDriver<'c> {
    /// Wraps a connection for the duration of the borrow.
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self {
            conn,
            dialect: SqliteDialect::new(),
        }
    }

    async fn run(&mut self, sql: &str) -> Result<u64> {
        debug!(sql = %sql, "Executing SQL");
        let result = sqlx::query(sql).execute(&mut *self.conn).await?;
        Ok(result.rows_affected())
    }
}

impl Driver for SqliteDriver<'_> {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<u64>> {
        Box::pin(self.run(sql))
    }

    fn query<'a>(
        &'a mut self,
        sql: &'a str,
        fields: &'a [FieldSpec],
    ) -> BoxFuture<'a, Result<Vec<Record>>> {
        Box::pin(async move {
            debug!(sql = %sql, "Running query");
            let rows = sqlx::query(sql).fetch_all(&mut *self.conn).await?;
            rows.iter()
                .map(|row| decode_row(row, fields))
                .collect::<Result<Vec<_>>>()
        })
    }

    fn begin(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.run("BEGIN").await?;
            Ok(())
        })
    }

    fn commit(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.run("COMMIT").await?;
            Ok(())
        })
    }

    fn rollback(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.run("ROLLBACK").await?;
            Ok(())
        })
    }
}

fn decode_row(row: &SqliteRow, fields: &[FieldSpec]) -> Result<Record> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| Ok((field.name(), decode(row, index, field.field_type())?)))
        .collect()
}

/// Reads column `index` by its storage class and casts it to `field_type`.
///
/// SQLite stores a value as NULL, INTEGER, REAL, TEXT or BLOB whatever the
/// declared column type, so the stored value is read as-is and converted
/// with [`Value::coerce`]. An integer read through a `text` field becomes
/// its decimal text, and an integer read through a `float` field widens.
fn decode(row: &SqliteRow, index: usize, field_type: FieldType) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    let stored = if raw.is_null() {
        Value::Null
    } else {
        let storage = raw.type_info().name().to_owned();
        match storage.as_str() {
            "INTEGER" => Value::Integer(row.try_get(index)?),
            "REAL" => Value::Float(row.try_get(index)?),
            "BLOB" => {
                let bytes: Vec<u8> = row.try_get(index)?;
                Value::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => Value::Text(row.try_get(index)?),
        }
    };
    Ok(stored.coerce(field_type)?)
}
