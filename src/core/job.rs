use std::time::{Duration, Instant};

use log::{error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    step::{Step, StepExecution},
};

/// Type alias for job execution results.
///
/// A `JobResult` is a `Result` that contains either:
/// - A completed `JobExecution` with execution details
/// - A `BatchError::Job` wrapping the error that made the job fail
pub type JobResult<T> = Result<T, BatchError>;

/// Status of a job execution.
///
/// A job starts `Running` and ends in exactly one of the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// The job is executing its steps.
    Running,
    /// Every step succeeded and the input was fully consumed.
    Completed,
    /// A step stopped on an error.
    Failed,
}

/// Represents a job that can be executed.
///
/// A job is a container for a sequence of steps that are executed in order.
/// The job orchestrates the steps, notifies its listeners and reports the
/// overall result.
pub trait Job {
    /// Runs the job and returns the result of the job execution.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when the job completes
    /// - `Err(BatchError::Job)` when a step fails
    fn run(&self) -> JobResult<JobExecution>;
}

/// Hook notified around a job run.
///
/// `after_job` is called exactly once per run, after the status is final,
/// whether the job completed or failed.
pub trait JobExecutionListener {
    fn before_job(&self, _job_execution: &JobExecution) {}

    /// Returns the number of records the listener verified, if it checked any.
    fn after_job(&self, job_execution: &JobExecution) -> Result<Option<u64>, BatchError>;
}

/// Represents the execution of a job.
///
/// This is the completion signal handed to listeners: the final status, the
/// per-step counters and the record count reported by a listener.
#[derive(Debug)]
pub struct JobExecution {
    pub id: Uuid,
    pub name: String,
    pub status: BatchStatus,
    /// The time when the job started executing
    pub start: Instant,
    /// The time when the job finished executing
    pub end: Instant,
    /// The total duration of the job execution
    pub duration: Duration,
    pub step_executions: Vec<StepExecution>,
    /// Count reported by the completion listener, `None` until one reports it.
    pub record_count: Option<u64>,
}

impl JobExecution {
    fn new(id: Uuid, name: &str) -> Self {
        let now = Instant::now();
        Self {
            id,
            name: name.to_string(),
            status: BatchStatus::Running,
            start: now,
            end: now,
            duration: Duration::default(),
            step_executions: Vec::new(),
            record_count: None,
        }
    }

    /// Total number of items written across all steps.
    pub fn write_count(&self) -> usize {
        self.step_executions.iter().map(|s| s.write_count).sum()
    }
}

/// Represents an instance of a job.
///
/// A `JobInstance` is created through the `JobBuilder`. Each call to `run`
/// is one execution: there is no restart from a previous execution.
pub struct JobInstance<'a> {
    /// Unique identifier for this job instance
    id: Uuid,
    /// Human-readable name for the job
    name: String,
    /// Collection of steps that make up this job, in execution order
    steps: Vec<&'a dyn Step>,
    listeners: Vec<&'a dyn JobExecutionListener>,
}

impl JobInstance<'_> {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    fn notify_after_job(&self, job_execution: &mut JobExecution) {
        for listener in &self.listeners {
            match listener.after_job(job_execution) {
                Ok(Some(count)) => job_execution.record_count = Some(count),
                Ok(None) => {}
                Err(err) => error!("Job listener of {} failed: {}", self.name, err),
            }
        }
    }
}

impl Job for JobInstance<'_> {
    /// Runs the job by executing its steps in sequence.
    ///
    /// The first failing step stops the job; the remaining steps are not run.
    /// Listeners see the final status before this method returns.
    fn run(&self) -> JobResult<JobExecution> {
        let mut job_execution = JobExecution::new(self.id, &self.name);

        info!("Start of job: {}, id: {}", self.name, self.id);

        for listener in &self.listeners {
            listener.before_job(&job_execution);
        }

        let mut failure = None;

        for step in &self.steps {
            let mut step_execution = StepExecution::new(step.get_name());
            let result = step.execute(&mut step_execution);
            job_execution.step_executions.push(step_execution);

            if let Err(err) = result {
                error!("Step {} of job {} failed: {}", step.get_name(), self.name, err);
                failure = Some(err);
                break;
            }
        }

        job_execution.status = if failure.is_none() {
            BatchStatus::Completed
        } else {
            BatchStatus::Failed
        };
        job_execution.end = Instant::now();
        job_execution.duration = job_execution.start.elapsed();

        info!(
            "End of job: {}, id: {}, status: {:?}",
            self.name, self.id, job_execution.status
        );

        self.notify_after_job(&mut job_execution);

        match failure {
            None => Ok(job_execution),
            Some(source) => Err(BatchError::Job {
                job: self.name.clone(),
                source: Box::new(source),
            }),
        }
    }
}

/// Builder for creating a job instance.
///
/// ```rust,no_run,compile_fail
/// let job = JobBuilder::new()
///     .name("importUserJob".to_string())
///     .listener(&listener)
///     .start(&step)
///     .build();
/// ```
#[derive(Default)]
pub struct JobBuilder<'a> {
    /// Optional name for the job (generated randomly if not specified)
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
    listeners: Vec<&'a dyn JobExecutionListener>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job.
    ///
    /// Same as `next()`, reads better for the initial step.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    /// Adds a step to the job. Steps are executed in the order they are added.
    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn listener(mut self, listener: &'a dyn JobExecutionListener) -> JobBuilder<'a> {
        self.listeners.push(listener);
        self
    }

    /// If no name has been provided, a random name is generated.
    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
            listeners: self.listeners,
        }
    }
}
