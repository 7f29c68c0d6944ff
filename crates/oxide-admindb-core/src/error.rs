//! Error types for field parsing, quoting and tree building.

use thiserror::Error;

use crate::field::FieldType;

/// Errors raised before any statement reaches the database.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A `type:name` field specifier could not be parsed.
    #[error("invalid field spec '{spec}': {reason}")]
    InvalidFieldSpec {
        /// The specifier as given by the caller.
        spec: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A table name is not a plain or qualified SQL identifier.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// A value cannot be represented as the declared field type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The declared field type.
        expected: FieldType,
        /// Description of the offending value.
        found: String,
    },

    /// A value record does not contain an entry for a listed field.
    #[error("missing value for field '{0}'")]
    MissingValue(String),

    /// A leveled row violates the pre-order input contract.
    #[error("invalid level {level} for row {id}: {reason}")]
    InvalidLevel {
        /// Id of the offending row, rendered for display.
        id: String,
        /// The level carried by the row.
        level: i64,
        /// Why the level was rejected.
        reason: String,
    },
}

impl Error {
    pub(crate) fn field_spec(spec: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFieldSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
