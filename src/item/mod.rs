#[cfg(feature = "csv")]
/// This module provides a CSV item reader with explicit field mapping.
pub mod csv;

#[cfg(feature = "rdbc")]
/// This module provides transactional bulk-insert item writers for SQL databases.
pub mod rdbc;
