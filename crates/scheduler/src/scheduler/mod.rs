//! Preemptive priority scheduling on a single simulated CPU.
//!
//! Each iteration the [`Scheduler`] computes the ready set from the
//! [`JobTable`], asks [`policy`] for the next job, has the [`Controller`]
//! bring it to Running, lets the [`Clock`] stand in for one quantum of
//! execution, then terminates or pauses the job. Lifecycle events go to an
//! [`EventLog`]; diagnostics go through `tracing`.

pub mod clock;
pub mod controller;
pub mod event_log;
pub mod metrics;
pub mod policy;
pub mod runner;
pub mod state;
pub mod task;
pub mod types;
pub mod workload;

pub use clock::{Clock, VirtualClock, WallClock};
pub use controller::Controller;
pub use event_log::{Event, EventLog, FileEventLog, MemoryEventLog};
pub use metrics::{JobStats, RunReport};
pub use runner::Scheduler;
pub use state::{Job, JobTable, SchedulerContext};
pub use task::{ExecutionHandle, SchedulerError, Workload};
pub use types::{Action, JobId, JobState, Slice, SliceOutcome, Tick, Ticks};
pub use workload::{ProcessWorkload, SimulatedWorkload};
