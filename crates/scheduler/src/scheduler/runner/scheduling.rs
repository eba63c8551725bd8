use crate::scheduler::clock::Clock;
use crate::scheduler::event_log::EventLog;
use crate::scheduler::policy;
use crate::scheduler::task::Workload;
use crate::scheduler::types::JobId;

use super::Scheduler;

impl<W: Workload, C: Clock, L: EventLog> Scheduler<W, C, L> {
    /// Job that should hold the CPU at the current time, if any is ready.
    pub fn next_job(&self) -> Option<JobId> {
        let ready = self.ctx.table.ready_set(self.ctx.now);
        policy::select(&self.ctx.table, &ready, self.ctx.previous)
    }
}
