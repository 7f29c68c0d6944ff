//! Binding table synchronization and lookup.

use oxide_admindb_core::{BindingTable, Value};
use serde::Serialize;
use tracing::debug;

use crate::driver::Driver;
use crate::error::Result;
use crate::transaction::finish;

/// Affected-row counts of one synchronization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BindingOutcome {
    /// Bindings added.
    pub inserted: u64,
    /// Bindings removed.
    pub deleted: u64,
}

impl BindingOutcome {
    /// Returns whether the call changed nothing.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

/// Makes the bindings stored for `owner` equal to `values`.
///
/// Runs the insert and then the delete inside one transaction. On any
/// failure the transaction is rolled back and the table is left as it was.
/// Values without a matching row in the bound table are ignored.
pub async fn binding_update<D>(
    db: &mut D,
    binding: &BindingTable,
    owner: impl Into<Value>,
    values: &[Value],
) -> Result<BindingOutcome>
where
    D: Driver + ?Sized,
{
    let owner = owner.into();
    let plan = binding.plan(db.dialect(), &owner, values)?;

    db.begin().await?;
    let outcome = apply(db, plan.insert.as_deref(), &plan.delete).await;
    let outcome = finish(db, outcome).await?;

    debug!(
        table = binding.table(),
        owner = %owner.to_text(),
        inserted = outcome.inserted,
        deleted = outcome.deleted,
        "Bindings synchronized"
    );
    Ok(outcome)
}

async fn apply<D>(db: &mut D, insert: Option<&str>, delete: &str) -> Result<BindingOutcome>
where
    D: Driver + ?Sized,
{
    let inserted = match insert {
        Some(sql) => db.execute(sql).await?,
        None => 0,
    };
    let deleted = db.execute(delete).await?;
    Ok(BindingOutcome { inserted, deleted })
}

/// Returns the values currently bound to `owner`, typed per the binding's
/// value field.
pub async fn binding_query<D>(
    db: &mut D,
    binding: &BindingTable,
    owner: impl Into<Value>,
) -> Result<Vec<Value>>
where
    D: Driver + ?Sized,
{
    let sql = binding.select_values(db.dialect(), &owner.into())?;
    let field = binding.value_field();
    let rows = db.query(&sql, std::slice::from_ref(field)).await?;
    Ok(rows
        .into_iter()
        .filter_map(|mut row| row.take(field.name()))
        .collect())
}
