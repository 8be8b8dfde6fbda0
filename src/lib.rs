#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Superstore batch

 A small chunk-oriented batch toolkit and the job built on it: read the
 "Sample - Superstore" sales CSV, upper-case the `segment` and `city` of
 every row, and insert the rows into a SQL table in atomic chunks.

 ## Core Concepts

- **Job:** the whole batch run. A `Job` executes its steps in order and
  notifies its `JobExecutionListener`s once the final status is known.
- **Step:** a chunk-oriented phase: read items, process them, write them
  one chunk at a time. The first error stops the step (fail-fast).
- **ItemReader:** retrieves input one item at a time.
- **ItemProcessor:** business logic applied to each item.
- **ItemWriter:** persists one chunk of items as a unit.

 ## Features

| **Feature**   | **Description**                                          |
|---------------|----------------------------------------------------------|
| csv           | CSV `ItemReader` with explicit field mapping (default)   |
| rdbc-sqlite   | Transactional SQLite `ItemWriter` (default)              |
| rdbc-postgres | Transactional PostgreSQL `ItemWriter`                    |
| full          | Enables all available features                           |

 ## Getting Started

```rust
# use std::cell::RefCell;
# use superstore_batch::{
#     core::{
#         item::{ItemWriter, ItemWriterResult},
#         job::{BatchStatus, Job, JobBuilder},
#         step::StepBuilder,
#     },
#     error::BatchError,
#     item::csv::csv_reader::CsvItemReaderBuilder,
#     superstore::{SalesRecord, SalesRecordFieldSetMapper, UpperCaseProcessor, FIELD_NAMES},
# };
# #[derive(Default)]
# struct VecWriter {
#     chunks: RefCell<Vec<Vec<SalesRecord>>>,
# }
# impl ItemWriter<SalesRecord> for VecWriter {
#     fn write(&self, items: &[SalesRecord]) -> ItemWriterResult {
#         self.chunks.borrow_mut().push(items.to_vec());
#         Ok(())
#     }
# }
fn main() -> Result<(), BatchError> {
    let csv = "\
1,O-1,2021-01-01,2021-01-02,C-1,Jane Doe,consumer,chicago,IL,100.0,2,0.1,90.0
2,O-1,2021-01-01,2021-01-02,C-1,Jane Doe,consumer,chicago,IL,12.5,1,0.0,3.2
3,O-2,2021-01-03,2021-01-07,C-2,John Roe,corporate,houston,TX,48.9,3,0.2,-4.1";

    let mapper = SalesRecordFieldSetMapper;
    let reader = CsvItemReaderBuilder::<SalesRecord>::new()
        .names(&FIELD_NAMES)
        .field_set_mapper(&mapper)
        .from_reader(csv.as_bytes())?;

    let processor = UpperCaseProcessor;
    let writer = VecWriter::default();

    let step = StepBuilder::new("step1")
        .chunk::<SalesRecord, SalesRecord>(2)
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .build()?;

    let job = JobBuilder::new().start(&step).build();
    let execution = job.run()?;

    assert_eq!(execution.status, BatchStatus::Completed);
    assert_eq!(writer.chunks.borrow().len(), 2);
    assert_eq!(writer.chunks.borrow()[1][0].city, "HOUSTON");

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Settings of the import job
pub mod config;

/// Set of items readers / writers (csv reader, SQL writers)
pub mod item;

#[cfg(all(feature = "csv", feature = "rdbc"))]
/// The Superstore sales import job
pub mod superstore;
