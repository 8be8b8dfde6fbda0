use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::error::BatchError;

/// Date layouts accepted by [`FieldSet::read_date`], tried in order.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// One tokenized line with its values bound positionally to the declared names.
#[derive(Debug)]
pub struct FieldSet<'a> {
    names: &'a [String],
    values: StringRecord,
    line: u64,
}

impl<'a> FieldSet<'a> {
    /// Binds `values` to `names`.
    ///
    /// Fails with `BatchError::Mapping` when the line does not have exactly
    /// one value per declared name.
    pub fn new(names: &'a [String], values: StringRecord, line: u64) -> Result<Self, BatchError> {
        if values.len() != names.len() {
            return Err(BatchError::Mapping(format!(
                "line {}: expected {} fields but found {}",
                line,
                names.len(),
                values.len()
            )));
        }

        Ok(Self {
            names,
            values,
            line,
        })
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn read_string(&self, name: &str) -> Result<String, BatchError> {
        self.value(name).map(str::to_string)
    }

    pub fn read_i64(&self, name: &str) -> Result<i64, BatchError> {
        self.parse(name, "integer")
    }

    pub fn read_i32(&self, name: &str) -> Result<i32, BatchError> {
        self.parse(name, "integer")
    }

    /// Reads a finite decimal; `NaN` and infinities are rejected.
    pub fn read_f64(&self, name: &str) -> Result<f64, BatchError> {
        let decimal: f64 = self.parse(name, "decimal")?;
        if decimal.is_finite() {
            Ok(decimal)
        } else {
            Err(self.invalid(name, self.value(name)?, "decimal"))
        }
    }

    /// Reads an ISO (`2021-01-31`) or US (`1/31/2021`) date.
    pub fn read_date(&self, name: &str) -> Result<NaiveDate, BatchError> {
        let value = self.value(name)?;

        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .ok_or_else(|| self.invalid(name, value, "date"))
    }

    fn value(&self, name: &str) -> Result<&str, BatchError> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| {
                BatchError::Mapping(format!("line {}: unknown field {}", self.line, name))
            })
    }

    fn parse<T: FromStr>(&self, name: &str, kind: &str) -> Result<T, BatchError> {
        let value = self.value(name)?;
        value.parse().map_err(|_| self.invalid(name, value, kind))
    }

    fn invalid(&self, name: &str, value: &str, kind: &str) -> BatchError {
        BatchError::Mapping(format!(
            "line {}: field {} is not a valid {}: {:?}",
            self.line, name, kind, value
        ))
    }
}

/// Turns a [`FieldSet`] into a typed item.
pub trait FieldSetMapper<T> {
    fn map_field_set(&self, field_set: &FieldSet) -> Result<T, BatchError>;
}
