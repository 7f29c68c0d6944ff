//! SQLite dialect.
//!
//! SQLite has no boolean storage class; `TRUE`/`FALSE` are aliases for
//! `1`/`0` since 3.23, so the integers are emitted directly.

use super::Dialect;

/// SQLite literal rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value {
            "1"
        } else {
            "0"
        }
    }
}
