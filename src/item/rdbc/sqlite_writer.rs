use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::core::item::{ItemWriter, ItemWriterResult};
use crate::item::rdbc::{block_on, write_error, DatabaseItemBinder, InsertTarget};
use crate::BatchError;

// SQLITE_MAX_VARIABLE_NUMBER since SQLite 3.32
const BIND_LIMIT: usize = 32766;

/// Inserts chunks into a SQLite table.
///
/// Each call to `write` runs in one transaction, so a chunk is committed
/// entirely or not at all. A chunk needing more bind parameters than SQLite
/// allows is split into several multi-row `INSERT` statements inside that
/// transaction.
///
/// With an in-memory database (`sqlite::memory:`) limit the pool to one
/// connection, otherwise every connection opens its own empty database.
///
/// ```no_run
/// use superstore_batch::item::rdbc::{DatabaseItemBinder, SqliteItemWriter};
/// use sqlx::{query_builder::Separated, Sqlite, SqlitePool};
///
/// struct Shipment {
///     order_id: String,
///     quantity: i32,
/// }
///
/// struct ShipmentBinder;
/// impl DatabaseItemBinder<Shipment, Sqlite> for ShipmentBinder {
///     fn bind(&self, item: &Shipment, mut values: Separated<Sqlite, &str>) {
///         values.push_bind(item.order_id.clone());
///         values.push_bind(item.quantity);
///     }
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = SqlitePool::connect("sqlite://superstore.db").await?;
/// let binder = ShipmentBinder;
///
/// let writer = SqliteItemWriter::<Shipment>::new()
///     .pool(&pool)
///     .table("shipments")
///     .add_column("order_id")
///     .add_column("quantity")
///     .item_binder(&binder);
/// # Ok(())
/// # }
/// ```
pub struct SqliteItemWriter<'a, O> {
    pool: Option<&'a Pool<Sqlite>>,
    target: InsertTarget<'a>,
    item_binder: Option<&'a dyn DatabaseItemBinder<O, Sqlite>>,
}

impl<O> Default for SqliteItemWriter<'_, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, O> SqliteItemWriter<'a, O> {
    /// Pool, table, columns and binder must all be set before the first write.
    pub fn new() -> Self {
        Self {
            pool: None,
            target: InsertTarget::default(),
            item_binder: None,
        }
    }

    pub fn pool(mut self, pool: &'a Pool<Sqlite>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn table(mut self, table: &'a str) -> Self {
        self.target.set_table(table);
        self
    }

    /// Values are bound in the order columns are added.
    pub fn add_column(mut self, column: &'a str) -> Self {
        self.target.push_column(column);
        self
    }

    pub fn item_binder(mut self, item_binder: &'a dyn DatabaseItemBinder<O, Sqlite>) -> Self {
        self.item_binder = Some(item_binder);
        self
    }
}

impl<O> ItemWriter<O> for SqliteItemWriter<'_, O> {
    /// # Errors
    ///
    /// `BatchError::Configuration` when the writer is incomplete,
    /// `BatchError::ItemWriter` on any database error. In both cases nothing
    /// of the chunk is kept.
    fn write(&self, items: &[O]) -> ItemWriterResult {
        if items.is_empty() {
            return Ok(());
        }

        let (table, prefix) = self.target.statement_prefix("SQLite")?;
        let pool = self
            .pool
            .ok_or_else(|| BatchError::Configuration("SQLite writer has no pool".to_string()))?;
        let item_binder = self.item_binder.ok_or_else(|| {
            BatchError::Configuration(format!("SQLite writer for table {} has no binder", table))
        })?;

        block_on(async {
            let mut transaction = pool.begin().await?;
            for rows in items.chunks(self.target.rows_per_statement(BIND_LIMIT)) {
                let mut query_builder = QueryBuilder::<Sqlite>::new(&prefix);
                query_builder.push_values(rows, |values, item| item_binder.bind(item, values));
                query_builder.build().execute(&mut *transaction).await?;
            }
            transaction.commit().await
        })
        .map_err(|error| write_error("SQLite", table, error))?;

        log::debug!("Inserted {} rows into SQLite table {}", items.len(), table);
        Ok(())
    }
}
