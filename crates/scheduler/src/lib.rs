//! Single-core preemptive priority scheduler.
//!
//! [`Scheduler`] runs a table of jobs to completion, one quantum at a time,
//! driving each job's execution context through spawn, pause, resume and
//! terminate. [`worker`] is the placeholder workload those contexts run.

pub mod scheduler;
pub mod worker;

pub use scheduler::{
    Clock, Controller, EventLog, FileEventLog, JobState, JobTable, MemoryEventLog,
    ProcessWorkload, RunReport, Scheduler, SchedulerError, SimulatedWorkload, Tick,
    VirtualClock, WallClock, Workload,
};
