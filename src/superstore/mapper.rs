use crate::{
    error::BatchError,
    item::csv::field_set::{FieldSet, FieldSetMapper},
};

use super::record::SalesRecord;

/// Builds a [`SalesRecord`] from a line bound to [`super::record::FIELD_NAMES`].
///
/// Every field is read explicitly with its parser; any missing or malformed
/// value is a `BatchError::Mapping`.
#[derive(Default)]
pub struct SalesRecordFieldSetMapper;

impl FieldSetMapper<SalesRecord> for SalesRecordFieldSetMapper {
    fn map_field_set(&self, field_set: &FieldSet) -> Result<SalesRecord, BatchError> {
        Ok(SalesRecord {
            row_id: field_set.read_i64("rowId")?,
            order_id: field_set.read_string("orderId")?,
            order_date: field_set.read_date("orderDate")?,
            ship_date: field_set.read_date("shipDate")?,
            customer_id: field_set.read_string("customerId")?,
            customer_name: field_set.read_string("customerName")?,
            segment: field_set.read_string("segment")?,
            city: field_set.read_string("city")?,
            state: field_set.read_string("state")?,
            sales: field_set.read_f64("sales")?,
            quantity: field_set.read_i32("quantity")?,
            discount: field_set.read_f64("discount")?,
            profit: field_set.read_f64("profit")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use csv::StringRecord;

    use super::*;
    use crate::superstore::record::FIELD_NAMES;

    const SAMPLE_LINE: &str =
        "1,O-1,2021-01-01,2021-01-02,C-1,Jane Doe,consumer,chicago,IL,100.0,2,0.1,90.0";

    fn names() -> Vec<String> {
        FIELD_NAMES.iter().map(|name| name.to_string()).collect()
    }

    fn field_set<'a>(names: &'a [String], line: &str) -> Result<FieldSet<'a>, BatchError> {
        FieldSet::new(names, StringRecord::from(line.split(',').collect::<Vec<_>>()), 1)
    }

    #[test]
    fn maps_all_thirteen_fields_in_order() -> Result<(), BatchError> {
        let names = names();
        let record = SalesRecordFieldSetMapper.map_field_set(&field_set(&names, SAMPLE_LINE)?)?;

        assert_eq!(
            record,
            SalesRecord {
                row_id: 1,
                order_id: "O-1".to_string(),
                order_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
                ship_date: NaiveDate::from_ymd_opt(2021, 1, 2).unwrap(),
                customer_id: "C-1".to_string(),
                customer_name: "Jane Doe".to_string(),
                segment: "consumer".to_string(),
                city: "chicago".to_string(),
                state: "IL".to_string(),
                sales: 100.0,
                quantity: 2,
                discount: 0.1,
                profit: 90.0,
            }
        );

        Ok(())
    }

    #[test]
    fn twelve_columns_is_a_mapping_error() {
        let names = names();
        let line = "1,O-1,2021-01-01,2021-01-02,C-1,Jane Doe,consumer,chicago,IL,100.0,2,0.1";

        assert!(matches!(field_set(&names, line), Err(BatchError::Mapping(_))));
    }

    #[test]
    fn non_numeric_quantity_is_a_mapping_error() -> Result<(), BatchError> {
        let names = names();
        let line = "1,O-1,2021-01-01,2021-01-02,C-1,Jane Doe,consumer,chicago,IL,100.0,two,0.1,90.0";

        let result = SalesRecordFieldSetMapper.map_field_set(&field_set(&names, line)?);

        match result {
            Err(BatchError::Mapping(message)) => assert!(message.contains("quantity")),
            other => panic!("expected a mapping error, got {:?}", other),
        }

        Ok(())
    }
}
