use log::{error, info};

use crate::{
    core::job::{BatchStatus, JobExecution, JobExecutionListener},
    error::BatchError,
    item::rdbc::RowCounter,
};

/// Verifies the target table once the import job has completed.
///
/// On `Completed` it counts the rows of the table and reports the count; on
/// `Failed` no query is issued.
pub struct JobCompletionNotificationListener<'a> {
    row_counter: &'a dyn RowCounter,
    table: &'a str,
}

impl<'a> JobCompletionNotificationListener<'a> {
    pub fn new(row_counter: &'a dyn RowCounter, table: &'a str) -> Self {
        Self { row_counter, table }
    }
}

impl JobExecutionListener for JobCompletionNotificationListener<'_> {
    fn after_job(&self, job_execution: &JobExecution) -> Result<Option<u64>, BatchError> {
        match job_execution.status {
            BatchStatus::Completed => {
                info!("!!! JOB FINISHED! Time to verify the results");

                let count = self.row_counter.count_rows(self.table)?;
                info!("Inserted count: {}", count);

                Ok(Some(count))
            }
            BatchStatus::Failed => {
                error!(
                    "Job {} failed after writing {} records, table {} not verified",
                    job_execution.name,
                    job_execution.write_count(),
                    self.table
                );
                Ok(None)
            }
            // listeners only see final statuses
            BatchStatus::Running => Ok(None),
        }
    }
}
