use tracing::{debug, warn};

use super::event_log::{Event, EventLog};
use super::state::Job;
use super::task::{SchedulerError, Workload};
use super::types::{Action, JobState, Ticks};

/// Drives jobs' execution contexts through their lifecycle and logs each step.
///
/// Legal transitions: Unspawned → Running (spawn), Stopped → Running (resume),
/// Running → Stopped (pause), Running → Terminated (terminate). Anything else
/// is rejected with [`SchedulerError::IllegalTransition`] before any side effect.
///
/// Signal failures are logged and otherwise ignored; the job's state follows
/// the controller's bookkeeping regardless.
pub struct Controller<W, L> {
    workload: W,
    log: L,
}

impl<W: Workload, L: EventLog> Controller<W, L> {
    pub fn new(workload: W, log: L) -> Self {
        Self { workload, log }
    }

    pub fn workload(&self) -> &W {
        &self.workload
    }

    pub fn event_log(&self) -> &L {
        &self.log
    }

    /// Start the job's execution context.
    pub fn spawn(&mut self, job: &mut Job) -> Result<(), SchedulerError> {
        check(job, Action::Spawn)?;
        let handle = self
            .workload
            .start(&job.name)
            .map_err(|source| SchedulerError::Spawn {
                job: job.name.clone(),
                source,
            })?;
        let pid = handle.id();
        job.handle = Some(handle);
        job.state = JobState::Running;

        self.log.record(&Event::Forking { name: &job.name })?;
        self.log.record(&Event::Executing {
            name: &job.name,
            pid,
        })?;
        debug!(job = %job.name, pid, "spawned");
        Ok(())
    }

    /// Continue a paused job.
    pub fn resume(&mut self, job: &mut Job) -> Result<(), SchedulerError> {
        check(job, Action::Resume)?;
        let pid = deliver(job, Action::Resume);
        job.state = JobState::Running;
        self.log.record(&Event::Resuming {
            name: &job.name,
            pid,
        })
    }

    /// Suspend a running job whose slice of `ran` units expired.
    pub fn pause(&mut self, job: &mut Job, ran: Ticks) -> Result<(), SchedulerError> {
        check(job, Action::Pause)?;
        self.log.record(&Event::SliceExpired {
            name: &job.name,
            ran,
        })?;
        deliver(job, Action::Pause);
        job.state = JobState::Stopped;
        Ok(())
    }

    /// End a running job and reap its execution context.
    pub fn terminate(&mut self, job: &mut Job) -> Result<(), SchedulerError> {
        check(job, Action::Terminate)?;
        let pid = job.pid().unwrap_or_default();
        self.log.record(&Event::Completed {
            name: &job.name,
            pid,
        })?;
        deliver(job, Action::Terminate);
        if let Some(mut handle) = job.handle.take() {
            if let Err(e) = handle.wait() {
                warn!(job = %job.name, pid, error = %e, "failed to reap job");
            }
        }
        job.state = JobState::Terminated;
        Ok(())
    }
}

fn check(job: &Job, action: Action) -> Result<(), SchedulerError> {
    if job.state == action.required_state() {
        Ok(())
    } else {
        Err(SchedulerError::IllegalTransition {
            job: job.name.clone(),
            from: job.state,
            action,
        })
    }
}

/// Send the signal for `action` to the job's context. Returns its PID (0 if none).
fn deliver(job: &mut Job, action: Action) -> u32 {
    let Some(handle) = job.handle.as_mut() else {
        warn!(job = %job.name, %action, "no execution context to signal");
        return 0;
    };
    let pid = handle.id();
    let result = match action {
        Action::Resume => handle.resume(),
        Action::Pause => handle.pause(),
        Action::Terminate => handle.terminate(),
        Action::Spawn => Ok(()),
    };
    if let Err(e) = result {
        warn!(job = %job.name, pid, %action, error = %e, "signal delivery failed");
    }
    pid
}

#[cfg(test)]
mod tests {
    use preempt_core::JobSpec;

    use super::*;
    use crate::scheduler::event_log::MemoryEventLog;
    use crate::scheduler::workload::{Signal, SimulatedWorkload};

    fn job(name: &str) -> Job {
        Job::new(
            JobSpec {
                name: name.to_string(),
                arrival: 0,
                priority: 1,
                exec_time: 4,
            },
            0,
        )
    }

    fn controller() -> Controller<SimulatedWorkload, MemoryEventLog> {
        Controller::new(SimulatedWorkload::new(500), MemoryEventLog::new())
    }

    #[test]
    fn full_lifecycle_logs_each_transition() {
        let mut ctl = controller();
        let mut j = job("alpha");

        ctl.spawn(&mut j).unwrap();
        assert_eq!(j.state(), JobState::Running);
        assert_eq!(j.pid(), Some(500));

        ctl.pause(&mut j, 2).unwrap();
        assert_eq!(j.state(), JobState::Stopped);

        ctl.resume(&mut j).unwrap();
        assert_eq!(j.state(), JobState::Running);

        ctl.terminate(&mut j).unwrap();
        assert_eq!(j.state(), JobState::Terminated);
        assert_eq!(j.pid(), None, "handle is released once reaped");

        assert_eq!(
            ctl.event_log().messages(),
            &[
                "Forking new process for alpha",
                "Executing alpha (PID: 500) using exec",
                "Alpha ran for 2 seconds. Time slice expired - Sending SIGSTOP",
                "Resuming alpha (PID: 500) - SIGCONT",
                "Alpha completed execution. Terminating (PID: 500)",
            ]
        );
        assert_eq!(
            ctl.workload().signals(),
            vec![
                Signal::Start { name: "alpha".into(), pid: 500 },
                Signal::Stop { pid: 500 },
                Signal::Cont { pid: 500 },
                Signal::Term { pid: 500 },
                Signal::Reaped { pid: 500 },
            ]
        );
    }

    #[test]
    fn illegal_transitions_are_rejected_without_side_effects() {
        let mut ctl = controller();
        let mut j = job("a");

        let err = ctl.pause(&mut j, 1).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::IllegalTransition {
                from: JobState::Unspawned,
                action: Action::Pause,
                ..
            }
        ));
        assert!(ctl.resume(&mut j).is_err());
        assert!(ctl.terminate(&mut j).is_err());

        ctl.spawn(&mut j).unwrap();
        assert!(ctl.spawn(&mut j).is_err(), "spawn happens at most once");
        assert!(ctl.resume(&mut j).is_err());

        ctl.terminate(&mut j).unwrap();
        assert!(ctl.pause(&mut j, 1).is_err());
        assert!(ctl.resume(&mut j).is_err());
        assert!(ctl.terminate(&mut j).is_err());

        assert_eq!(ctl.event_log().messages().len(), 3);
    }

    #[test]
    fn spawn_failure_is_reported() {
        let mut ctl = Controller::new(
            SimulatedWorkload::default().failing_on("bad"),
            MemoryEventLog::new(),
        );
        let mut j = job("bad");

        let err = ctl.spawn(&mut j).unwrap_err();
        assert!(matches!(err, SchedulerError::Spawn { ref job, .. } if job == "bad"));
        assert_eq!(j.state(), JobState::Unspawned);
        assert!(ctl.event_log().messages().is_empty());
    }
}
