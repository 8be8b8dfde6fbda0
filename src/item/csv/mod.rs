//! Delimited file input.
//!
//! Lines are split by the csv crate and bound positionally to an explicit,
//! ordered list of field names. A [`field_set::FieldSetMapper`] then builds
//! the typed item from the named values, so no reflection or serde
//! derive is involved in the column binding.

/// Reader turning delimited lines into mapped items.
pub mod csv_reader;

/// Named access to the values of one line.
pub mod field_set;
