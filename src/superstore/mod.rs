//! The Superstore sales import: field mapping, the upper-case transformation,
//! SQL binding and the completion check, wired into a single-step job.

pub mod binder;

pub mod import;

pub mod listener;

pub mod mapper;

pub mod processor;

pub mod record;

pub use binder::SalesRecordBinder;
pub use import::{run_import_job, run_import_job_from_reader};
pub use listener::JobCompletionNotificationListener;
pub use mapper::SalesRecordFieldSetMapper;
pub use processor::UpperCaseProcessor;
pub use record::{create_table_statement, SalesRecord, COLUMNS, FIELD_NAMES};
