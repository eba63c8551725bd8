use std::io;

use preempt_core::PreemptError;

use super::types::{Action, JobState, Ticks};

/// Error type for the scheduling loop and execution controller.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Core(#[from] PreemptError),
    #[error("fork error: failed to start job {job}: {source}")]
    Spawn {
        job: String,
        #[source]
        source: io::Error,
    },
    #[error("illegal transition: cannot {action} job {job} while {from}")]
    IllegalTransition {
        job: String,
        from: JobState,
        action: Action,
    },
    #[error("simulated time overflow: {job} cannot run {duration} units at t={now}")]
    TimeOverflow {
        job: String,
        now: Ticks,
        duration: Ticks,
    },
    #[error("event log write failed: {0}")]
    EventLog(#[source] io::Error),
    #[error("report error: {0}")]
    Report(String),
}

/// Owned reference to a job's live execution context.
///
/// Signal-style operations report OS failures as `io::Error`; the controller
/// logs them and carries on with its own bookkeeping.
pub trait ExecutionHandle {
    /// OS-level identifier of the execution context (a PID for real processes).
    fn id(&self) -> u32;

    /// Suspend without destroying the context.
    fn pause(&mut self) -> io::Result<()>;

    /// Continue a suspended context.
    fn resume(&mut self) -> io::Result<()>;

    /// Ask the context to end.
    fn terminate(&mut self) -> io::Result<()>;

    /// Block until the context has exited and reap it.
    fn wait(&mut self) -> io::Result<()>;
}

/// Factory for execution contexts running a job's placeholder workload.
pub trait Workload {
    /// Start a new execution context for the named job.
    fn start(&mut self, name: &str) -> io::Result<Box<dyn ExecutionHandle>>;
}

