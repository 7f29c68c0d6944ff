//! admindb CLI
//!
//! Command-line access to the admin database helpers.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_admindb::{
    BindingTable, FieldSpec, FieldType, Record, SqliteDriver, Value, binding_query,
    binding_update, exec, fetch_row, field_max, insert_row, option_array, option_tree,
    update_column, update_row,
};

/// Typed-field database helpers for admin pages.
#[derive(Parser)]
#[command(name = "admindb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output (logs every statement).
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Describes a binding table.
#[derive(Args)]
struct BindingArgs {
    /// Binding table name.
    #[arg(long)]
    table: String,

    /// Binding table field holding the owner id (`type:name`).
    #[arg(long)]
    owner_field: String,

    /// Binding table field holding the bound id (`type:name`).
    #[arg(long)]
    value_field: String,

    /// Table referenced by the value field.
    #[arg(long)]
    bound_table: String,

    /// Id field of the bound table (`type:name`).
    #[arg(long, default_value = "id")]
    bound_field: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one row by id.
    Fetch {
        /// Table name.
        #[arg(long)]
        table: String,

        /// Comma-separated fields (`type:name`, default text).
        #[arg(long, value_delimiter = ',', required = true)]
        fields: Vec<String>,

        /// Id field (`type:name`, default integer).
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Id of the row.
        #[arg(long)]
        id: String,
    },

    /// Insert one row.
    Insert {
        /// Table name.
        #[arg(long)]
        table: String,

        /// Field assignments as `type:name=value`.
        #[arg(long = "set", required = true)]
        assignments: Vec<String>,

        /// Return the new id by reading the maximum of this field.
        #[arg(long)]
        id_field: Option<String>,
    },

    /// Update one row by id.
    Update {
        /// Table name.
        #[arg(long)]
        table: String,

        /// Field assignments as `type:name=value`.
        #[arg(long = "set", required = true)]
        assignments: Vec<String>,

        /// Id field (`type:name`, default integer).
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Id of the row.
        #[arg(long)]
        id: String,
    },

    /// Set one column on several rows.
    UpdateColumn {
        /// Table name.
        #[arg(long)]
        table: String,

        /// Field to set (`type:name`, default integer).
        #[arg(long)]
        field: String,

        /// New value.
        #[arg(long)]
        value: String,

        /// Id field (`type:name`, default integer).
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Comma-separated ids.
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Show the maximum value of a field.
    Max {
        /// Table name.
        #[arg(long)]
        table: String,

        /// Field (`type:name`, default integer).
        #[arg(long, default_value = "id")]
        field: String,
    },

    /// Replace the bindings of one owner.
    Bind {
        #[command(flatten)]
        binding: BindingArgs,

        /// Owner id.
        #[arg(long)]
        owner: String,

        /// Comma-separated bound ids (empty to clear).
        #[arg(long, value_delimiter = ',')]
        values: Vec<String>,
    },

    /// List the bindings of one owner.
    Bindings {
        #[command(flatten)]
        binding: BindingArgs,

        /// Owner id.
        #[arg(long)]
        owner: String,
    },

    /// List `(id, title)` options of a table.
    Options {
        /// Table name.
        #[arg(long)]
        table: String,

        /// Title field (`type:name`, default text).
        #[arg(long, default_value = "title")]
        title_field: String,

        /// Id field (`type:name`, default integer).
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Order-by fragment, without `ORDER BY`.
        #[arg(long)]
        order_by: Option<String>,

        /// Where fragment, without `WHERE`.
        #[arg(long = "where")]
        where_clause: Option<String>,
    },

    /// Build an option tree from a query returning id, title, level.
    Tree {
        /// Query or procedure call yielding leveled rows in pre-order.
        #[arg(long)]
        sql: String,

        /// Id field (`type:name`, default integer).
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Title field (`type:name`, default text).
        #[arg(long, default_value = "title")]
        title_field: String,

        /// Level field (`type:name`, default integer).
        #[arg(long, default_value = "level")]
        level_field: String,

        /// Level of top-level rows.
        #[arg(long, default_value_t = 0)]
        base_level: i64,
    },

    /// Execute a raw statement.
    Exec {
        /// SQL statement.
        sql: String,
    },
}

/// Splits `type:name=value` assignments into field specs and a value record.
fn parse_assignments(assignments: &[String]) -> anyhow::Result<(Vec<String>, Record)> {
    let mut fields = Vec::with_capacity(assignments.len());
    let mut values = Record::new();

    for assignment in assignments {
        let Some((spec, raw)) = assignment.split_once('=') else {
            bail!("assignment '{assignment}' is not of the form type:name=value");
        };
        let field = FieldSpec::parse(spec, FieldType::Text)?;
        values.insert(field.name(), Value::parse_as(raw, field.field_type())?);
        fields.push(spec.to_string());
    }

    Ok((fields, values))
}

fn parse_id(id_field: &str, raw: &str) -> anyhow::Result<Value> {
    let field = FieldSpec::parse(id_field, FieldType::Integer)?;
    Ok(Value::parse_as(raw, field.field_type())?)
}

fn parse_values(raw: &[String], field_type: FieldType) -> anyhow::Result<Vec<Value>> {
    raw.iter()
        .filter(|v| !v.is_empty())
        .map(|v| Ok(Value::parse_as(v, field_type)?))
        .collect()
}

impl BindingArgs {
    fn to_binding(&self) -> anyhow::Result<BindingTable> {
        Ok(BindingTable::new(
            &self.table,
            &self.owner_field,
            &self.value_field,
            &self.bound_table,
            &self.bound_field,
        )?)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Connect to database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&cli.database)
        .await
        .with_context(|| format!("failed to open {}", cli.database))?;
    let mut conn = pool.acquire().await?;
    let mut db = SqliteDriver::new(&mut conn);

    match cli.command {
        Commands::Fetch {
            table,
            fields,
            id_field,
            id,
        } => {
            let id = parse_id(&id_field, &id)?;
            match fetch_row(&mut db, &table, &as_strs(&fields), &id_field, id).await? {
                Some(row) => print_json(&row)?,
                None => info!("No row found."),
            }
        }

        Commands::Insert {
            table,
            assignments,
            id_field,
        } => {
            let (fields, values) = parse_assignments(&assignments)?;
            let id = insert_row(&mut db, &table, &as_strs(&fields), &values, id_field.as_deref())
                .await?;
            match id {
                Some(id) => print_json(&id)?,
                None => info!("Row inserted."),
            }
        }

        Commands::Update {
            table,
            assignments,
            id_field,
            id,
        } => {
            let (fields, values) = parse_assignments(&assignments)?;
            let id = parse_id(&id_field, &id)?;
            let count = update_row(&mut db, &table, &as_strs(&fields), &values, &id_field, id).await?;
            info!("{} row(s) updated.", count);
        }

        Commands::UpdateColumn {
            table,
            field,
            value,
            id_field,
            ids,
        } => {
            let spec = FieldSpec::parse(&field, FieldType::Integer)?;
            let value = Value::parse_as(&value, spec.field_type())?;
            let id_type = FieldSpec::parse(&id_field, FieldType::Integer)?.field_type();
            let ids = parse_values(&ids, id_type)?;
            let count = update_column(&mut db, &table, &field, value, &id_field, &ids).await?;
            info!("{} row(s) updated.", count);
        }

        Commands::Max { table, field } => match field_max(&mut db, &table, &field).await? {
            Some(max) => print_json(&max)?,
            None => info!("Table is empty."),
        },

        Commands::Bind {
            binding,
            owner,
            values,
        } => {
            let binding = binding.to_binding()?;
            let owner = Value::parse_as(&owner, binding.owner_field().field_type())?;
            let values = parse_values(&values, binding.value_field().field_type())?;
            let outcome = binding_update(&mut db, &binding, owner, &values).await?;
            print_json(&outcome)?;
        }

        Commands::Bindings { binding, owner } => {
            let binding = binding.to_binding()?;
            let owner = Value::parse_as(&owner, binding.owner_field().field_type())?;
            let values = binding_query(&mut db, &binding, owner).await?;
            print_json(&values)?;
        }

        Commands::Options {
            table,
            title_field,
            id_field,
            order_by,
            where_clause,
        } => {
            let options = option_array(
                &mut db,
                &table,
                &title_field,
                &id_field,
                order_by.as_deref(),
                where_clause.as_deref(),
            )
            .await?;
            print_json(&options)?;
        }

        Commands::Tree {
            sql,
            id_field,
            title_field,
            level_field,
            base_level,
        } => {
            let tree =
                option_tree(&mut db, &sql, &id_field, &title_field, &level_field, base_level).await?;
            print_json(&tree)?;
        }

        Commands::Exec { sql } => {
            let count = exec(&mut db, &sql).await?;
            info!("{} row(s) affected.", count);
        }
    }

    Ok(())
}
