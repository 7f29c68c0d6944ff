//! SQL statement generation for row-level admin operations.
//!
//! Every function here takes parsed [`FieldSpec`]s and typed [`Value`]s and
//! returns finished SQL text with inline literals. Values are rendered only
//! through [`Dialect::quote`] using the type declared by their field, and
//! table names are checked with [`check_identifier`] first.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::field::{check_identifier, FieldSpec, FieldType};
use crate::record::Record;
use crate::value::Value;

/// Renders `values` as a comma-joined literal list for an `IN (...)` clause.
pub fn in_list<D: Dialect + ?Sized>(
    dialect: &D,
    field_type: FieldType,
    values: &[Value],
) -> Result<String> {
    let quoted = values
        .iter()
        .map(|v| dialect.quote(v, field_type))
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(", "))
}

fn field_list(fields: &[FieldSpec]) -> String {
    fields
        .iter()
        .map(FieldSpec::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn value_for<'r>(values: &'r Record, field: &FieldSpec) -> Result<&'r Value> {
    values
        .get(field.name())
        .ok_or_else(|| Error::MissingValue(field.name().to_string()))
}

fn require_fields(fields: &[FieldSpec]) -> Result<()> {
    if fields.is_empty() {
        return Err(Error::InvalidFieldSpec {
            spec: String::new(),
            reason: String::from("empty field list"),
        });
    }
    Ok(())
}

/// `SELECT a, b FROM t WHERE id = <id>`
pub fn select_row<D: Dialect + ?Sized>(
    dialect: &D,
    table: &str,
    fields: &[FieldSpec],
    id_field: &FieldSpec,
    id: &Value,
) -> Result<String> {
    let table = check_identifier(table)?;
    require_fields(fields)?;
    Ok(format!(
        "SELECT {} FROM {table} WHERE {} = {}",
        field_list(fields),
        id_field.name(),
        dialect.quote(id, id_field.field_type())?
    ))
}

/// `INSERT INTO t (a, b) VALUES (<a>, <b>)`
pub fn insert_row<D: Dialect + ?Sized>(
    dialect: &D,
    table: &str,
    fields: &[FieldSpec],
    values: &Record,
) -> Result<String> {
    let table = check_identifier(table)?;
    require_fields(fields)?;
    let literals = fields
        .iter()
        .map(|f| dialect.quote(value_for(values, f)?, f.field_type()))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        field_list(fields),
        literals.join(", ")
    ))
}

/// `UPDATE t SET a = <a>, b = <b> WHERE id = <id>`
pub fn update_row<D: Dialect + ?Sized>(
    dialect: &D,
    table: &str,
    fields: &[FieldSpec],
    values: &Record,
    id_field: &FieldSpec,
    id: &Value,
) -> Result<String> {
    let table = check_identifier(table)?;
    require_fields(fields)?;
    let assignments = fields
        .iter()
        .map(|f| {
            let literal = dialect.quote(value_for(values, f)?, f.field_type())?;
            Ok(format!("{} = {literal}", f.name()))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "UPDATE {table} SET {} WHERE {} = {}",
        assignments.join(", "),
        id_field.name(),
        dialect.quote(id, id_field.field_type())?
    ))
}

/// `UPDATE t SET f = <v> WHERE id IN (<ids>)`
///
/// Returns `None` when `ids` is empty: there is nothing to update and no
/// statement should be issued.
pub fn update_column<D: Dialect + ?Sized>(
    dialect: &D,
    table: &str,
    field: &FieldSpec,
    value: &Value,
    id_field: &FieldSpec,
    ids: &[Value],
) -> Result<Option<String>> {
    let table = check_identifier(table)?;
    if ids.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!(
        "UPDATE {table} SET {} = {} WHERE {} IN ({})",
        field.name(),
        dialect.quote(value, field.field_type())?,
        id_field.name(),
        in_list(dialect, id_field.field_type(), ids)?
    )))
}

/// `SELECT MAX(f) AS f FROM t`
pub fn select_max(table: &str, field: &FieldSpec) -> Result<String> {
    let table = check_identifier(table)?;
    let alias = field.name().rsplit('.').next().unwrap_or(field.name());
    Ok(format!("SELECT MAX({}) AS {alias} FROM {table}", field.name()))
}

/// `SELECT id, title FROM t [WHERE ...] [ORDER BY ...]`
///
/// The where and order-by fragments are trusted SQL supplied by the
/// calling page, without their leading keywords.
pub fn select_options(
    table: &str,
    title_field: &FieldSpec,
    id_field: &FieldSpec,
    order_by: Option<&str>,
    where_clause: Option<&str>,
) -> Result<String> {
    let table = check_identifier(table)?;
    let mut sql = format!(
        "SELECT {}, {} FROM {table}",
        id_field.name(),
        title_field.name()
    );
    if let Some(clause) = where_clause.filter(|c| !c.trim().is_empty()) {
        sql.push_str(" WHERE ");
        sql.push_str(clause);
    }
    if let Some(order) = order_by.filter(|c| !c.trim().is_empty()) {
        sql.push_str(" ORDER BY ");
        sql.push_str(order);
    }
    Ok(sql)
}
