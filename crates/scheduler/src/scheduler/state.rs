use std::fmt;

use preempt_core::JobSpec;

use super::task::ExecutionHandle;
use super::types::{JobId, JobState, Ticks};

/// A schedulable job and its execution bookkeeping.
pub struct Job {
    pub name: String,
    pub arrival: Ticks,
    pub priority: i64,
    pub exec_time: Ticks,
    /// Position in the input. Final tie-break.
    pub order: JobId,
    pub(crate) remaining: Ticks,
    pub(crate) state: JobState,
    pub(crate) handle: Option<Box<dyn ExecutionHandle>>,
}

impl Job {
    pub fn new(spec: JobSpec, order: JobId) -> Self {
        Self {
            name: spec.name,
            arrival: spec.arrival,
            priority: spec.priority,
            exec_time: spec.exec_time,
            order,
            remaining: spec.exec_time,
            state: JobState::Unspawned,
            handle: None,
        }
    }

    pub fn remaining(&self) -> Ticks {
        self.remaining
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Identifier of the execution context, once spawned.
    pub fn pid(&self) -> Option<u32> {
        self.handle.as_ref().map(|h| h.id())
    }

    pub fn is_ready(&self, now: Ticks) -> bool {
        self.arrival <= now && self.state != JobState::Terminated
    }

    /// Subtract elapsed run time. Never goes below zero.
    pub(crate) fn consume(&mut self, ran: Ticks) {
        debug_assert!(ran <= self.remaining, "job {} ran past its remaining time", self.name);
        self.remaining = self.remaining.saturating_sub(ran);
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("arrival", &self.arrival)
            .field("priority", &self.priority)
            .field("exec_time", &self.exec_time)
            .field("order", &self.order)
            .field("remaining", &self.remaining)
            .field("state", &self.state)
            .field("pid", &self.pid())
            .finish()
    }
}

/// All jobs known to the scheduler, indexed by input order.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: Vec<Job>,
}

impl JobTable {
    pub fn new(specs: Vec<JobSpec>) -> Self {
        let jobs = specs
            .into_iter()
            .enumerate()
            .map(|(order, spec)| Job::new(spec, order))
            .collect();
        Self { jobs }
    }

    /// Jobs that have arrived by `now` and are not terminated, in input order.
    pub fn ready_set(&self, now: Ticks) -> Vec<JobId> {
        self.jobs
            .iter()
            .filter(|job| job.is_ready(now))
            .map(|job| job.order)
            .collect()
    }

    /// True when every job is terminated (trivially true for an empty table).
    pub fn all_finished(&self) -> bool {
        self.jobs.iter().all(|job| job.state == JobState::Terminated)
    }

    pub fn job(&self, id: JobId) -> &Job {
        &self.jobs[id]
    }

    pub(crate) fn job_mut(&mut self, id: JobId) -> &mut Job {
        &mut self.jobs[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Mutable scheduling context threaded through every iteration.
#[derive(Debug, Default)]
pub struct SchedulerContext {
    pub table: JobTable,
    /// Current simulated time.
    pub now: Ticks,
    /// Job that held the CPU during the last non-idle iteration.
    pub previous: Option<JobId>,
}

impl SchedulerContext {
    pub fn new(table: JobTable) -> Self {
        Self {
            table,
            now: 0,
            previous: None,
        }
    }
}
