//! Error types for database operations.

use thiserror::Error;

/// Errors returned by the admin database helpers.
#[derive(Debug, Error)]
pub enum AdminDbError {
    /// Field spec, identifier, value or level error detected before any
    /// statement was issued.
    #[error(transparent)]
    Core(#[from] oxide_admindb_core::Error),

    /// The driver reported a failure.
    #[error("database error: {message}")]
    Database {
        /// Driver message.
        message: String,
        /// Underlying sqlx error, when the driver is sqlx-backed.
        #[source]
        source: Option<sqlx::Error>,
    },
}

impl AdminDbError {
    /// Creates a database error from a driver message.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Returns whether the error came from the database.
    #[must_use]
    pub const fn is_database(&self) -> bool {
        matches!(self, Self::Database { .. })
    }
}

impl From<sqlx::Error> for AdminDbError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, AdminDbError>;
