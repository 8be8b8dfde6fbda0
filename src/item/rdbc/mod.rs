use std::future::Future;

use sqlx::{query_builder::Separated, Database};

use crate::BatchError;

#[cfg(feature = "rdbc-postgres")]
pub mod postgres_writer;

#[cfg(feature = "rdbc-sqlite")]
pub mod sqlite_writer;

/// Trait for binding item data to database query parameters.
///
/// The binder pushes one value per configured column, in column order. It is
/// the explicit replacement for reflective property-to-column binding.
///
/// # Type Parameters
///
/// * `O` - The item type to bind
/// * `DB` - The SQLx database type (e.g., `Postgres`, `Sqlite`)
///
/// # Examples
///
/// ```no_run
/// use superstore_batch::item::rdbc::DatabaseItemBinder;
/// use sqlx::{query_builder::Separated, Sqlite};
///
/// struct User {
///     id: i32,
///     name: String,
/// }
///
/// struct UserBinder;
/// impl DatabaseItemBinder<User, Sqlite> for UserBinder {
///     fn bind(&self, item: &User, mut query_builder: Separated<Sqlite, &str>) {
///         query_builder.push_bind(item.id);
///         query_builder.push_bind(item.name.clone());
///     }
/// }
/// ```
pub trait DatabaseItemBinder<O, DB: Database> {
    /// Binds the properties of an item to a separated query builder.
    fn bind(&self, item: &O, query_builder: Separated<DB, &str>);
}

/// Table and ordered column list of a multi-row `INSERT INTO`, shared by the
/// SQL writers.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InsertTarget<'a> {
    table: Option<&'a str>,
    columns: Vec<&'a str>,
}

impl<'a> InsertTarget<'a> {
    pub fn table(&self) -> Option<&'a str> {
        self.table
    }

    pub fn columns(&self) -> &[&'a str] {
        &self.columns
    }

    pub(crate) fn set_table(&mut self, table: &'a str) {
        self.table = Some(table);
    }

    pub(crate) fn push_column(&mut self, column: &'a str) {
        self.columns.push(column);
    }

    /// Returns the table and the `INSERT INTO table (c1,c2,...) ` prefix that
    /// `push_values` completes.
    pub(crate) fn statement_prefix(&self, database: &str) -> Result<(&'a str, String), BatchError> {
        let table = self.table.ok_or_else(|| {
            BatchError::Configuration(format!("{} writer has no table", database))
        })?;
        if self.columns.is_empty() {
            return Err(BatchError::Configuration(format!(
                "{} writer for table {} has no columns",
                database, table
            )));
        }
        Ok((
            table,
            format!("INSERT INTO {} ({}) ", table, self.columns.join(",")),
        ))
    }

    /// Rows a single statement may carry without exceeding `bind_limit` parameters.
    pub(crate) fn rows_per_statement(&self, bind_limit: usize) -> usize {
        (bind_limit / self.columns.len().max(1)).max(1)
    }
}

/// Logs a failed chunk insert and turns it into a `BatchError::ItemWriter`.
pub(crate) fn write_error(database: &str, table: &str, error: sqlx::Error) -> BatchError {
    log::error!("Failed to write items to {} table {}: {}", database, table, error);
    BatchError::ItemWriter(format!("{} write failed: {}", database, error))
}

/// Read-only verification query run once a job has completed.
pub trait RowCounter {
    /// Returns `SELECT COUNT(*)` of `table`.
    fn count_rows(&self, table: &str) -> Result<u64, BatchError>;
}

/// Runs `future` to completion from synchronous step code.
///
/// Requires a multi-threaded tokio runtime: the current worker is handed
/// over with `block_in_place` while the future runs on the runtime handle.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn count_error(table: &str, error: sqlx::Error) -> BatchError {
    BatchError::ItemReader(format!("count of table {} failed: {}", table, error))
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

#[cfg(feature = "rdbc-sqlite")]
impl RowCounter for sqlx::Pool<sqlx::Sqlite> {
    fn count_rows(&self, table: &str) -> Result<u64, BatchError> {
        let query = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = block_on(sqlx::query_scalar(&query).fetch_one(self))
            .map_err(|error| count_error(table, error))?;
        Ok(to_count(count))
    }
}

#[cfg(feature = "rdbc-postgres")]
impl RowCounter for sqlx::Pool<sqlx::Postgres> {
    fn count_rows(&self, table: &str) -> Result<u64, BatchError> {
        let query = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = block_on(sqlx::query_scalar(&query).fetch_one(self))
            .map_err(|error| count_error(table, error))?;
        Ok(to_count(count))
    }
}


#[cfg(feature = "rdbc-postgres")]
pub use postgres_writer::PostgresItemWriter;
#[cfg(feature = "rdbc-sqlite")]
pub use sqlite_writer::SqliteItemWriter;
