use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    /// A raw line could not be bound to the declared fields.
    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    /// A processor rejected an item.
    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    /// A job ended with the `Failed` status. `source` is the first error that stopped it.
    #[error("Job {job} failed: {source}")]
    Job {
        job: String,
        #[source]
        source: Box<BatchError>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),
}
