//! SQL dialect support.
//!
//! A dialect knows how to render a typed [`Value`] as an inline SQL literal.
//! Quoting always goes through [`Dialect::quote`], which first coerces the
//! value to the declared [`FieldType`]; text is escaped by doubling single
//! quotes so caller input can never terminate the literal.

mod generic;
mod sqlite;

pub use generic::GenericDialect;
pub use sqlite::SqliteDialect;

use crate::error::{Error, Result};
use crate::field::FieldType;
use crate::value::Value;

/// Trait for SQL dialect-specific literal rendering.
pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the literal for a boolean.
    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "TRUE"
        } else {
            "FALSE"
        }
    }

    /// Escapes and single-quotes a string literal.
    fn string_literal(&self, value: &str) -> String {
        let escaped = value.replace('\'', "''");
        format!("'{escaped}'")
    }

    /// Renders an already coerced value as a literal.
    fn literal(&self, value: &Value) -> Result<String> {
        Ok(match value {
            Value::Null => String::from("NULL"),
            Value::Integer(n) => format!("{n}"),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(Error::TypeMismatch {
                        expected: FieldType::Float,
                        found: value.describe(),
                    });
                }
                // Debug output keeps the decimal point: `3.0`, not `3`.
                format!("{f:?}")
            }
            Value::Boolean(b) => String::from(self.boolean_literal(*b)),
            Value::Text(s) => self.string_literal(s),
            Value::Date(_) | Value::Time(_) | Value::Timestamp(_) => {
                self.string_literal(&value.to_text())
            }
        })
    }

    /// Coerces `value` to `field_type` and renders it as a literal.
    fn quote(&self, value: &Value, field_type: FieldType) -> Result<String> {
        let coerced = value.clone().coerce(field_type)?;
        self.literal(&coerced)
    }
}
