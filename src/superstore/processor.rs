use log::info;

use crate::core::item::{ItemProcessor, ItemProcessorResult};

use super::record::SalesRecord;

/// Upper-cases `segment` and `city`; every other field is copied unchanged.
#[derive(Default)]
pub struct UpperCaseProcessor;

impl ItemProcessor<SalesRecord, SalesRecord> for UpperCaseProcessor {
    fn process(&self, item: &SalesRecord) -> ItemProcessorResult<SalesRecord> {
        let record = SalesRecord {
            segment: item.segment.to_uppercase(),
            city: item.city.to_uppercase(),
            ..item.clone()
        };

        info!("Converting ({:?}) into ({:?})", item, record);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(segment: &str, city: &str) -> SalesRecord {
        SalesRecord {
            row_id: 1,
            order_id: "O-1".to_string(),
            order_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            ship_date: NaiveDate::from_ymd_opt(2021, 1, 2).unwrap(),
            customer_id: "C-1".to_string(),
            customer_name: "Jane Doe".to_string(),
            segment: segment.to_string(),
            city: city.to_string(),
            state: "IL".to_string(),
            sales: 100.0,
            quantity: 2,
            discount: 0.1,
            profit: 90.0,
        }
    }

    #[test]
    fn upper_cases_segment_and_city_only() {
        let item = record("consumer", "chicago");

        let processed = UpperCaseProcessor.process(&item).unwrap();

        assert_eq!(processed.segment, "CONSUMER");
        assert_eq!(processed.city, "CHICAGO");
        assert_eq!(
            processed,
            SalesRecord {
                segment: "CONSUMER".to_string(),
                city: "CHICAGO".to_string(),
                ..item
            }
        );
    }

    #[test]
    fn upper_casing_is_idempotent() {
        let once = UpperCaseProcessor
            .process(&record("Home Office", "San Francisco"))
            .unwrap();
        let twice = UpperCaseProcessor.process(&once).unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice.segment, "HOME OFFICE");
    }

    #[test]
    fn empty_values_stay_empty() {
        let processed = UpperCaseProcessor.process(&record("", "")).unwrap();

        assert_eq!(processed.segment, "");
        assert_eq!(processed.city, "");
    }

    #[test]
    fn non_ascii_cities_are_upper_cased() {
        let processed = UpperCaseProcessor
            .process(&record("corporate", "montréal"))
            .unwrap();

        assert_eq!(processed.city, "MONTRÉAL");
    }
}
