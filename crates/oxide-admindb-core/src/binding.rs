//! Binding table synchronization planning.
//!
//! A binding table links one owner row to a set of rows in a bound table,
//! e.g. `admingroup_user (groupnum, usernum)` between admin groups and
//! admin users. [`BindingTable::plan`] computes the two statements that move
//! an owner's stored bindings to a desired set:
//!
//! - an `INSERT ... SELECT` adding bound rows that are desired but missing;
//! - a `DELETE` removing stored bindings that are not desired.
//!
//! Both statements are idempotent. Executing the insert then the delete in
//! one transaction leaves exactly the desired bindings, whatever was stored
//! before. Desired ids that do not exist in the bound table are never
//! inserted.

use std::collections::HashSet;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::field::{check_identifier, FieldSpec, FieldType};
use crate::value::Value;

/// Describes a many-to-many binding table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable {
    table: String,
    owner_field: FieldSpec,
    value_field: FieldSpec,
    bound_table: String,
    bound_field: FieldSpec,
}

/// The statements that bring one owner's bindings to a desired set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPlan {
    /// Adds missing bindings. `None` when the desired set is empty.
    pub insert: Option<String>,
    /// Removes bindings outside the desired set.
    pub delete: String,
}

impl BindingTable {
    /// Creates a binding description.
    ///
    /// Field arguments use the `type:name` syntax and default to `integer`.
    pub fn new(
        table: &str,
        owner_field: &str,
        value_field: &str,
        bound_table: &str,
        bound_field: &str,
    ) -> Result<Self> {
        Ok(Self {
            table: check_identifier(table)?.to_string(),
            owner_field: FieldSpec::parse(owner_field, FieldType::Integer)?,
            value_field: FieldSpec::parse(value_field, FieldType::Integer)?,
            bound_table: check_identifier(bound_table)?.to_string(),
            bound_field: FieldSpec::parse(bound_field, FieldType::Integer)?,
        })
    }

    /// Returns the binding table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the field holding the owner id.
    #[must_use]
    pub const fn owner_field(&self) -> &FieldSpec {
        &self.owner_field
    }

    /// Returns the field holding the bound id.
    #[must_use]
    pub const fn value_field(&self) -> &FieldSpec {
        &self.value_field
    }

    /// Builds the insert and delete statements for `owner` and `desired`.
    ///
    /// Duplicate desired values are collapsed.
    pub fn plan<D: Dialect + ?Sized>(
        &self,
        dialect: &D,
        owner: &Value,
        desired: &[Value],
    ) -> Result<BindingPlan> {
        let owner = dialect.quote(owner, self.owner_field.field_type())?;

        let mut seen = HashSet::new();
        let mut literals = Vec::with_capacity(desired.len());
        for value in desired {
            let literal = dialect.quote(value, self.value_field.field_type())?;
            if seen.insert(literal.clone()) {
                literals.push(literal);
            }
        }

        let mut delete = format!(
            "DELETE FROM {} WHERE {} = {owner}",
            self.table,
            self.owner_field.name()
        );

        if literals.is_empty() {
            return Ok(BindingPlan {
                insert: None,
                delete,
            });
        }

        let value_list = literals.join(", ");

        let insert = format!(
            "INSERT INTO {table} ({owner_field}, {value_field}) \
             SELECT {owner}, {bound_field} FROM {bound_table} \
             WHERE {bound_field} NOT IN \
             (SELECT {value_field} FROM {table} WHERE {owner_field} = {owner}) \
             AND {bound_field} IN ({value_list})",
            table = self.table,
            owner_field = self.owner_field.name(),
            value_field = self.value_field.name(),
            bound_field = self.bound_field.name(),
            bound_table = self.bound_table,
        );

        delete.push_str(&format!(
            " AND {} NOT IN ({value_list})",
            self.value_field.name()
        ));

        Ok(BindingPlan {
            insert: Some(insert),
            delete,
        })
    }

    /// `SELECT value FROM t WHERE owner = <owner>`
    pub fn select_values<D: Dialect + ?Sized>(&self, dialect: &D, owner: &Value) -> Result<String> {
        Ok(format!(
            "SELECT {} FROM {} WHERE {} = {}",
            self.value_field.name(),
            self.table,
            self.owner_field.name(),
            dialect.quote(owner, self.owner_field.field_type())?
        ))
    }
}
