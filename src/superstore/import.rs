use std::io::Read;

use crate::{
    config::ImportConfig,
    core::{
        item::{ItemReader, ItemWriter},
        job::{Job, JobBuilder, JobExecution, JobResult},
        step::StepBuilder,
    },
    item::{csv::csv_reader::CsvItemReaderBuilder, rdbc::RowCounter},
};

use super::{
    listener::JobCompletionNotificationListener,
    mapper::SalesRecordFieldSetMapper,
    processor::UpperCaseProcessor,
    record::{SalesRecord, FIELD_NAMES},
};

pub const JOB_NAME: &str = "importUserJob";
pub const STEP_NAME: &str = "step1";

static MAPPER: SalesRecordFieldSetMapper = SalesRecordFieldSetMapper;

/// Runs the import job on the file at `config.input_path`.
///
/// The file is opened by the step, so a missing file fails the job like any
/// other read error and the completion listener sees `Failed`.
pub fn run_import_job(
    config: &ImportConfig,
    writer: &dyn ItemWriter<SalesRecord>,
    row_counter: &dyn RowCounter,
) -> JobResult<JobExecution> {
    let reader = reader_builder(config).from_path(&config.input_path)?;
    run(config, &reader, writer, row_counter)
}

/// Runs the import job on `input` instead of the configured file.
pub fn run_import_job_from_reader<R: Read>(
    config: &ImportConfig,
    input: R,
    writer: &dyn ItemWriter<SalesRecord>,
    row_counter: &dyn RowCounter,
) -> JobResult<JobExecution> {
    let reader = reader_builder(config).from_reader(input)?;
    run(config, &reader, writer, row_counter)
}

fn reader_builder(config: &ImportConfig) -> CsvItemReaderBuilder<'static, SalesRecord> {
    CsvItemReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_headers)
        .names(&FIELD_NAMES)
        .field_set_mapper(&MAPPER)
}

fn run(
    config: &ImportConfig,
    reader: &dyn ItemReader<SalesRecord>,
    writer: &dyn ItemWriter<SalesRecord>,
    row_counter: &dyn RowCounter,
) -> JobResult<JobExecution> {
    let processor = UpperCaseProcessor;

    let step = StepBuilder::new(STEP_NAME)
        .chunk::<SalesRecord, SalesRecord>(config.chunk_size)
        .reader(reader)
        .processor(&processor)
        .writer(writer)
        .build()?;

    let listener = JobCompletionNotificationListener::new(row_counter, &config.table_name);

    let job = JobBuilder::new()
        .name(JOB_NAME.to_string())
        .listener(&listener)
        .start(&step)
        .build();

    job.run()
}
