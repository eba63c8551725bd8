use preempt_core::JobFile;
use tracing::info;

use crate::scheduler::clock::Clock;
use crate::scheduler::controller::Controller;
use crate::scheduler::event_log::EventLog;
use crate::scheduler::metrics::RunReport;
use crate::scheduler::state::{JobTable, SchedulerContext};
use crate::scheduler::task::Workload;
use crate::scheduler::types::Ticks;

/// The preemptive priority scheduler. Owns the job table and drives every
/// job to completion on a single simulated CPU.
pub struct Scheduler<W, C, L> {
    /// Maximum units a job runs before it is re-evaluated.
    pub(super) quantum: Ticks,
    pub(super) ctx: SchedulerContext,
    pub(super) controller: Controller<W, L>,
    pub(super) clock: C,
    pub(super) report: RunReport,
}

impl<W: Workload, C: Clock, L: EventLog> Scheduler<W, C, L> {
    /// Build a scheduler over a parsed jobs file.
    pub fn new(job_file: JobFile, workload: W, clock: C, log: L) -> Self {
        let table = JobTable::new(job_file.jobs);
        let report = RunReport::new(job_file.quantum, &table);
        info!(
            quantum = job_file.quantum,
            jobs = table.len(),
            "scheduler initialized"
        );
        Self {
            quantum: job_file.quantum,
            ctx: SchedulerContext::new(table),
            controller: Controller::new(workload, log),
            clock,
            report,
        }
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum
    }

    pub fn context(&self) -> &SchedulerContext {
        &self.ctx
    }

    pub fn table(&self) -> &JobTable {
        &self.ctx.table
    }

    /// Current simulated time.
    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn workload(&self) -> &W {
        self.controller.workload()
    }

    pub fn event_log(&self) -> &L {
        self.controller.event_log()
    }

    /// Report accumulated so far.
    pub fn report(&self) -> &RunReport {
        &self.report
    }
}
