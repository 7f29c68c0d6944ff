//! Single-row and single-column operations.
//!
//! Field arguments use the `type:name` syntax. Unless noted otherwise,
//! row fields default to `text` and id fields to `integer`.

use oxide_admindb_core::{statement, FieldSpec, FieldType, Record, Value};

use crate::driver::Driver;
use crate::error::Result;
use crate::transaction::finish;

/// Fetches one row by id.
///
/// Returns `None` when no row matches.
pub async fn fetch_row<D>(
    db: &mut D,
    table: &str,
    fields: &[&str],
    id_field: &str,
    id: impl Into<Value>,
) -> Result<Option<Record>>
where
    D: Driver + ?Sized,
{
    let fields = FieldSpec::parse_all(fields, FieldType::Text)?;
    let id_field = FieldSpec::parse(id_field, FieldType::Integer)?;
    let sql = statement::select_row(db.dialect(), table, &fields, &id_field, &id.into())?;

    let rows = db.query(&sql, &fields).await?;
    Ok(rows.into_iter().next())
}

/// Inserts one row.
///
/// When `id_field` is given, the insert and a `MAX(id_field)` query run in
/// one transaction and the maximum is returned as the new row's id.
pub async fn insert_row<D>(
    db: &mut D,
    table: &str,
    fields: &[&str],
    values: &Record,
    id_field: Option<&str>,
) -> Result<Option<Value>>
where
    D: Driver + ?Sized,
{
    let fields = FieldSpec::parse_all(fields, FieldType::Text)?;
    let id_field = id_field
        .map(|f| FieldSpec::parse(f, FieldType::Integer))
        .transpose()?;
    let sql = statement::insert_row(db.dialect(), table, &fields, values)?;

    let Some(id_field) = id_field else {
        db.execute(&sql).await?;
        return Ok(None);
    };

    let max_sql = statement::select_max(table, &id_field)?;
    db.begin().await?;
    let outcome = insert_then_max(db, &sql, &max_sql, &id_field).await;
    finish(db, outcome).await
}

async fn insert_then_max<D>(
    db: &mut D,
    insert_sql: &str,
    max_sql: &str,
    id_field: &FieldSpec,
) -> Result<Option<Value>>
where
    D: Driver + ?Sized,
{
    db.execute(insert_sql).await?;
    max_of(db, max_sql, id_field).await
}

/// Updates the listed fields of the row identified by `id`.
///
/// Returns the number of affected rows.
pub async fn update_row<D>(
    db: &mut D,
    table: &str,
    fields: &[&str],
    values: &Record,
    id_field: &str,
    id: impl Into<Value>,
) -> Result<u64>
where
    D: Driver + ?Sized,
{
    let fields = FieldSpec::parse_all(fields, FieldType::Text)?;
    let id_field = FieldSpec::parse(id_field, FieldType::Integer)?;
    let sql = statement::update_row(db.dialect(), table, &fields, values, &id_field, &id.into())?;

    db.execute(&sql).await
}

/// Sets one column to `value` on every row whose id is in `ids`.
///
/// Both `field` and `id_field` default to `integer`. An empty id list
/// issues no statement and returns `0`.
pub async fn update_column<D>(
    db: &mut D,
    table: &str,
    field: &str,
    value: impl Into<Value>,
    id_field: &str,
    ids: &[Value],
) -> Result<u64>
where
    D: Driver + ?Sized,
{
    let field = FieldSpec::parse(field, FieldType::Integer)?;
    let id_field = FieldSpec::parse(id_field, FieldType::Integer)?;
    let sql = statement::update_column(db.dialect(), table, &field, &value.into(), &id_field, ids)?;

    match sql {
        Some(sql) => db.execute(&sql).await,
        None => Ok(0),
    }
}

/// Returns the maximum stored value of a field (default `integer`).
///
/// Returns `None` for an empty table.
pub async fn field_max<D>(db: &mut D, table: &str, field: &str) -> Result<Option<Value>>
where
    D: Driver + ?Sized,
{
    let field = FieldSpec::parse(field, FieldType::Integer)?;
    let sql = statement::select_max(table, &field)?;
    max_of(db, &sql, &field).await
}

async fn max_of<D>(db: &mut D, sql: &str, field: &FieldSpec) -> Result<Option<Value>>
where
    D: Driver + ?Sized,
{
    let rows = db.query(sql, std::slice::from_ref(field)).await?;
    Ok(rows
        .into_iter()
        .next()
        .and_then(|mut row| row.take(field.name()))
        .filter(|v| !v.is_null()))
}
