//! Database driver abstraction.
//!
//! The helpers in this crate only need a handful of primitives from a
//! database: run a statement, run a query decoding columns per field type,
//! quote a literal, and delimit a transaction. [`Driver`] captures exactly
//! that. Implementations borrow a connection owned by the caller; nothing
//! here opens, pools or closes connections.

use futures::future::BoxFuture;
use oxide_admindb_core::{Dialect, FieldSpec, FieldType, Record, Value};

use crate::error::Result;

/// The database interface used by every admin helper.
///
/// Async methods return boxed futures so the trait stays object safe and
/// helpers can take `&mut dyn Driver`.
pub trait Driver: Send {
    /// Returns the dialect used to render literals.
    fn dialect(&self) -> &dyn Dialect;

    /// Quotes `value` as a literal of `field_type`.
    fn quote(&self, value: &Value, field_type: FieldType) -> Result<String> {
        Ok(self.dialect().quote(value, field_type)?)
    }

    /// Executes a statement and returns the number of affected rows.
    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<u64>>;

    /// Runs a query and decodes column `i` of every row as `fields[i]`.
    fn query<'a>(
        &'a mut self,
        sql: &'a str,
        fields: &'a [FieldSpec],
    ) -> BoxFuture<'a, Result<Vec<Record>>>;

    /// Starts a transaction.
    fn begin(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Commits the current transaction.
    fn commit(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Rolls back the current transaction.
    fn rollback(&mut self) -> BoxFuture<'_, Result<()>>;
}
