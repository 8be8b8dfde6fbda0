use sqlx::query_builder::Separated;

use crate::item::rdbc::DatabaseItemBinder;

use super::record::SalesRecord;

/// Binds the 13 fields of a [`SalesRecord`] in [`super::record::COLUMNS`] order.
#[derive(Default)]
pub struct SalesRecordBinder;

macro_rules! bind_sales_record {
    ($db:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl DatabaseItemBinder<SalesRecord, $db> for SalesRecordBinder {
            fn bind(&self, item: &SalesRecord, mut query_builder: Separated<$db, &str>) {
                query_builder.push_bind(item.row_id);
                query_builder.push_bind(item.order_id.clone());
                query_builder.push_bind(item.order_date);
                query_builder.push_bind(item.ship_date);
                query_builder.push_bind(item.customer_id.clone());
                query_builder.push_bind(item.customer_name.clone());
                query_builder.push_bind(item.segment.clone());
                query_builder.push_bind(item.city.clone());
                query_builder.push_bind(item.state.clone());
                query_builder.push_bind(item.sales);
                query_builder.push_bind(item.quantity);
                query_builder.push_bind(item.discount);
                query_builder.push_bind(item.profit);
            }
        }
    };
}

bind_sales_record!(sqlx::Sqlite, "rdbc-sqlite");
bind_sales_record!(sqlx::Postgres, "rdbc-postgres");
