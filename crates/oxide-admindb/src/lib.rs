//! # oxide-admindb
//!
//! Database helpers for admin pages: the small set of typed operations that
//! edit, order, bind and list rows, executed through an explicit [`Driver`].
//!
//! This crate provides:
//! - [`fetch_row`], [`insert_row`], [`update_row`], [`update_column`],
//!   [`field_max`] for edit and order pages
//! - [`binding_update`] and [`binding_query`] for many-to-many checklists
//! - [`option_array`] and [`option_tree`] for select widgets
//! - [`exec`] and [`query_one`] for ad-hoc statements
//! - [`SqliteDriver`], a [`Driver`] over a borrowed sqlx connection
//!
//! Fields are named with the `type:name` syntax of
//! [`oxide_admindb_core::FieldSpec`]; values are typed
//! [`oxide_admindb_core::Value`]s quoted per field type.
//!
//! ## Quick Start
//!
//! ```ignore
//! use oxide_admindb::{binding_update, fetch_row, update_column, BindingTable, SqliteDriver, Value};
//! use sqlx::{Connection, SqliteConnection};
//!
//! async fn example(conn: &mut SqliteConnection) -> oxide_admindb::Result<()> {
//!     let mut db = SqliteDriver::new(conn);
//!
//!     // Load a row for an edit page
//!     let group = fetch_row(&mut db, "admingroups", &["title"], "id", 3).await?;
//!
//!     // Disable a selection of rows
//!     let ids = [Value::from(1), Value::from(2)];
//!     update_column(&mut db, "adminusers", "boolean:enabled", false, "id", &ids).await?;
//!
//!     // Replace the users bound to group 3
//!     let binding = BindingTable::new("admingroup_user", "groupnum", "usernum", "adminusers", "id")?;
//!     binding_update(&mut db, &binding, 3, &ids).await?;
//!
//!     Ok(())
//! }
//! ```

mod binding;
mod driver;
mod error;
mod options;
mod query;
mod rows;
mod sqlite;
mod transaction;

pub use binding::{binding_query, binding_update, BindingOutcome};
pub use driver::Driver;
pub use error::{AdminDbError, Result};
pub use options::{option_array, option_tree};
pub use query::{exec, query_one};
pub use rows::{fetch_row, field_max, insert_row, update_column, update_row};
pub use sqlite::SqliteDriver;

pub use oxide_admindb_core::{
    BindingTable, FieldSpec, FieldType, LeveledRow, Record, TreeNode, Value,
};
