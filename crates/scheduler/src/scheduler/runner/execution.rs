use tracing::{debug, info};

use crate::scheduler::clock::Clock;
use crate::scheduler::event_log::EventLog;
use crate::scheduler::metrics::RunReport;
use crate::scheduler::task::{SchedulerError, Workload};
use crate::scheduler::types::{JobState, Slice, SliceOutcome, Tick};

use super::Scheduler;

impl<W: Workload, C: Clock, L: EventLog> Scheduler<W, C, L> {
    /// Run one scheduling iteration.
    ///
    /// With nothing ready, time advances by a single unit and no job is
    /// touched. Otherwise the selected job is brought to Running, given
    /// `min(remaining, quantum)` units, then terminated or paused.
    pub fn step(&mut self) -> Result<Tick, SchedulerError> {
        let Some(id) = self.next_job() else {
            let at = self.ctx.now;
            self.clock.wait(1);
            // Some unfinished job arrives after `now`, so this stays in range.
            self.ctx.now += 1;
            self.report.record_idle();
            debug!(at, "idle tick");
            return Ok(Tick::Idle { at });
        };

        let start = self.ctx.now;
        let job = self.ctx.table.job_mut(id);
        let duration = job.remaining().min(self.quantum);
        let end = start
            .checked_add(duration)
            .ok_or_else(|| SchedulerError::TimeOverflow {
                job: job.name.clone(),
                now: start,
                duration,
            })?;

        match job.state() {
            JobState::Stopped => self.controller.resume(job)?,
            JobState::Unspawned => self.controller.spawn(job)?,
            JobState::Running | JobState::Terminated => {}
        }

        debug!(job = %job.name, start, duration, "dispatching");
        self.clock.wait(duration);
        self.ctx.now = end;
        job.consume(duration);

        let outcome = if job.remaining() == 0 {
            self.controller.terminate(job)?;
            SliceOutcome::Completed
        } else {
            self.controller.pause(job, duration)?;
            SliceOutcome::Preempted
        };
        debug_assert_eq!(
            job.remaining() == 0,
            job.state() == JobState::Terminated,
            "remaining time and terminal state disagree for {}",
            job.name
        );

        let slice = Slice {
            start,
            job: id,
            name: job.name.clone(),
            duration,
            outcome,
        };
        self.ctx.previous = Some(id);
        self.report.record_slice(&slice);
        Ok(Tick::Ran(slice))
    }

    /// Drive every job to completion and return the run report.
    ///
    /// Any spawn, log or transition failure aborts the run immediately.
    pub fn run(&mut self) -> Result<RunReport, SchedulerError> {
        info!(
            quantum = self.quantum,
            jobs = self.ctx.table.len(),
            "scheduler starting"
        );

        while !self.ctx.table.all_finished() {
            if let Tick::Ran(slice) = self.step()? {
                if slice.outcome == SliceOutcome::Completed {
                    info!(job = %slice.name, at = self.ctx.now, "job completed");
                }
            }
        }

        self.report.makespan = self.ctx.now;
        info!(makespan = self.ctx.now, "scheduler stopped");
        Ok(self.report.clone())
    }
}
