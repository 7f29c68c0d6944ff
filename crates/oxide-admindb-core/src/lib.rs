//! # oxide-admindb-core
//!
//! Typed building blocks for admin-page database access.
//!
//! This crate provides:
//! - [`FieldSpec`]: the `type:name` field micro-syntax, parsed in one place
//! - [`Value`] and [`Record`]: typed scalars and rows
//! - [`Dialect`]: type-aware literal quoting
//! - [`statement`]: SQL for row fetch, insert, update, column update and max
//! - [`BindingTable`]: insert/delete planning for many-to-many bindings
//! - [`tree`]: reconstruction of a hierarchy from leveled rows
//!
//! Nothing here talks to a database; the `oxide-admindb` crate executes the
//! generated statements.
//!
//! ## SQL Injection Prevention
//!
//! Values are never pasted into SQL as raw strings. Each one is coerced to
//! the type declared by its field and rendered by the dialect:
//!
//! ```rust
//! use oxide_admindb_core::{statement, FieldSpec, FieldType, GenericDialect, Value};
//!
//! let fields = FieldSpec::parse_all(&["title"], FieldType::Text).unwrap();
//! let id = FieldSpec::parse("username", FieldType::Text).unwrap();
//! let sql = statement::select_row(
//!     &GenericDialect,
//!     "adminusers",
//!     &fields,
//!     &id,
//!     &Value::from("'; DROP TABLE adminusers; --"),
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT title FROM adminusers WHERE username = '''; DROP TABLE adminusers; --'"
//! );
//! ```

pub mod binding;
pub mod dialect;
pub mod error;
pub mod field;
pub mod record;
pub mod statement;
pub mod tree;
pub mod value;

pub use binding::{BindingPlan, BindingTable};
pub use dialect::{Dialect, GenericDialect, SqliteDialect};
pub use error::{Error, Result};
pub use field::{FieldSpec, FieldType};
pub use record::Record;
pub use tree::{build_tree, build_tree_from, LeveledRow, TreeBuilder, TreeNode};
pub use value::Value;
