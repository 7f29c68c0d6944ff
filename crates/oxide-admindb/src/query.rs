//! Raw statement helpers.

use oxide_admindb_core::{FieldSpec, FieldType, Value};

use crate::driver::Driver;
use crate::error::Result;

/// Executes a statement and returns the number of affected rows.
pub async fn exec<D>(db: &mut D, sql: &str) -> Result<u64>
where
    D: Driver + ?Sized,
{
    db.execute(sql).await
}

/// Returns the first column of the first row, decoded as `field_type`.
///
/// Returns `None` when the query yields no rows or a NULL.
pub async fn query_one<D>(db: &mut D, sql: &str, field_type: FieldType) -> Result<Option<Value>>
where
    D: Driver + ?Sized,
{
    let field = FieldSpec::new("value", field_type)?;
    let rows = db.query(sql, std::slice::from_ref(&field)).await?;
    Ok(rows
        .into_iter()
        .next()
        .and_then(|mut row| row.take(field.name()))
        .filter(|v| !v.is_null()))
}
