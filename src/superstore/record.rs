use chrono::NaiveDate;

/// Field names of the input file, in column order.
pub const FIELD_NAMES: [&str; 13] = [
    "rowId",
    "orderId",
    "orderDate",
    "shipDate",
    "customerId",
    "customerName",
    "segment",
    "city",
    "state",
    "sales",
    "quantity",
    "discount",
    "profit",
];

/// Columns of the target table, in the same order as [`FIELD_NAMES`].
pub const COLUMNS: [&str; 13] = [
    "row_id",
    "order_id",
    "order_date",
    "ship_date",
    "customer_id",
    "customer_name",
    "segment",
    "city",
    "state",
    "sales",
    "quantity",
    "discount",
    "profit",
];

/// One order line of the Superstore sales file.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// Storage key; uniqueness is enforced by the table.
    pub row_id: i64,
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub customer_id: String,
    pub customer_name: String,
    pub segment: String,
    pub city: String,
    pub state: String,
    pub sales: f64,
    pub quantity: i32,
    pub discount: f64,
    pub profit: f64,
}

/// `CREATE TABLE IF NOT EXISTS` statement for `table`, valid on SQLite and PostgreSQL.
pub fn create_table_statement(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            row_id BIGINT PRIMARY KEY,
            order_id VARCHAR(32) NOT NULL,
            order_date DATE NOT NULL,
            ship_date DATE NOT NULL,
            customer_id VARCHAR(32) NOT NULL,
            customer_name VARCHAR(255) NOT NULL,
            segment VARCHAR(64) NOT NULL,
            city VARCHAR(128) NOT NULL,
            state VARCHAR(64) NOT NULL,
            sales DOUBLE PRECISION NOT NULL,
            quantity INTEGER NOT NULL,
            discount DOUBLE PRECISION NOT NULL,
            profit DOUBLE PRECISION NOT NULL
        )",
        table
    )
}
