//! Option lists and option trees for select widgets.

use oxide_admindb_core::{statement, FieldSpec, FieldType, LeveledRow, TreeBuilder, TreeNode, Value};

use crate::driver::Driver;
use crate::error::Result;

/// Queries `(id, title)` pairs from a table.
///
/// `title_field` defaults to `text` and `id_field` to `integer`.
/// `order_by` and `where_clause` are trusted SQL fragments without their
/// leading keywords.
pub async fn option_array<D>(
    db: &mut D,
    table: &str,
    title_field: &str,
    id_field: &str,
    order_by: Option<&str>,
    where_clause: Option<&str>,
) -> Result<Vec<(Value, String)>>
where
    D: Driver + ?Sized,
{
    let title_field = FieldSpec::parse(title_field, FieldType::Text)?;
    let id_field = FieldSpec::parse(id_field, FieldType::Integer)?;
    let sql = statement::select_options(table, &title_field, &id_field, order_by, where_clause)?;

    let fields = [id_field, title_field];
    let rows = db.query(&sql, &fields).await?;
    let [id_field, title_field] = &fields;

    Ok(rows
        .into_iter()
        .map(|mut row| {
            let id = row.take(id_field.name()).unwrap_or(Value::Null);
            let title = row
                .take(title_field.name())
                .map(|v| v.to_text())
                .unwrap_or_default();
            (id, title)
        })
        .collect())
}

/// Runs a query returning `(id, title, level)` rows in pre-order and
/// rebuilds the hierarchy.
///
/// `sql` is typically a stored procedure call. Its three columns must come
/// in the order id, title, level; the field arguments name and type them
/// (defaults `integer`, `text`, `integer`). Top-level rows carry
/// `base_level`.
pub async fn option_tree<D>(
    db: &mut D,
    sql: &str,
    id_field: &str,
    title_field: &str,
    level_field: &str,
    base_level: i64,
) -> Result<TreeNode>
where
    D: Driver + ?Sized,
{
    let fields = [
        FieldSpec::parse(id_field, FieldType::Integer)?,
        FieldSpec::parse(title_field, FieldType::Text)?,
        FieldSpec::parse(level_field, FieldType::Integer)?,
    ];
    let rows = db.query(sql, &fields).await?;

    let mut builder = TreeBuilder::with_base_level(base_level);
    for record in &rows {
        let row = LeveledRow::from_record(record, fields[0].name(), fields[1].name(), fields[2].name())?;
        builder.push(row)?;
    }
    Ok(builder.finish())
}
