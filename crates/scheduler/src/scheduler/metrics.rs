use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::state::JobTable;
use super::task::SchedulerError;
use super::types::{Slice, SliceOutcome, Ticks};

/// Per-job outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub name: String,
    pub arrival: Ticks,
    pub exec_time: Ticks,
    /// Time the job first got the CPU.
    pub first_run: Option<Ticks>,
    /// Time the job's last slice ended.
    pub completion: Option<Ticks>,
    /// Number of slices the job ran.
    pub slices: usize,
    /// Number of times the job was paused at quantum expiry.
    pub preemptions: usize,
}

impl JobStats {
    /// Completion minus arrival.
    pub fn turnaround(&self) -> Option<Ticks> {
        self.completion.map(|c| c - self.arrival)
    }

    /// Time spent ready but not running.
    pub fn waiting(&self) -> Option<Ticks> {
        self.turnaround().map(|t| t.saturating_sub(self.exec_time))
    }

    /// First run minus arrival.
    pub fn response(&self) -> Option<Ticks> {
        self.first_run.map(|f| f - self.arrival)
    }
}

/// Record of a whole scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub quantum: Ticks,
    /// Every slice in execution order.
    pub timeline: Vec<Slice>,
    /// Units during which nothing was ready.
    pub idle_ticks: Ticks,
    /// Final simulated time.
    pub makespan: Ticks,
    pub jobs: Vec<JobStats>,
}

impl RunReport {
    pub fn new(quantum: Ticks, table: &JobTable) -> Self {
        Self {
            quantum,
            jobs: table
                .iter()
                .map(|job| JobStats {
                    name: job.name.clone(),
                    arrival: job.arrival,
                    exec_time: job.exec_time,
                    first_run: None,
                    completion: None,
                    slices: 0,
                    preemptions: 0,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn record_idle(&mut self) {
        self.idle_ticks += 1;
    }

    pub fn record_slice(&mut self, slice: &Slice) {
        let end = slice.start + slice.duration;
        if let Some(stats) = self.jobs.get_mut(slice.job) {
            stats.first_run.get_or_insert(slice.start);
            stats.slices += 1;
            match slice.outcome {
                SliceOutcome::Preempted => stats.preemptions += 1,
                SliceOutcome::Completed => stats.completion = Some(end),
            }
        }
        self.timeline.push(slice.clone());
    }

    /// Total run time given to a job across all its slices.
    pub fn run_time(&self, job: usize) -> Ticks {
        self.timeline
            .iter()
            .filter(|s| s.job == job)
            .map(|s| s.duration)
            .sum()
    }

    /// Emit a per-job summary through `tracing`.
    pub fn log_summary(&self) {
        info!(
            jobs = self.jobs.len(),
            slices = self.timeline.len(),
            idle_ticks = self.idle_ticks,
            makespan = self.makespan,
            "run complete"
        );
        for stats in &self.jobs {
            info!(
                job = %stats.name,
                turnaround = stats.turnaround(),
                waiting = stats.waiting(),
                response = stats.response(),
                preemptions = stats.preemptions,
                "job summary"
            );
        }
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SchedulerError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SchedulerError::Report(e.to_string()))?;
        std::fs::write(path.as_ref(), json).map_err(|e| {
            SchedulerError::Report(format!("{}: {}", path.as_ref().display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use preempt_core::JobSpec;

    use super::*;

    fn report() -> RunReport {
        let table = JobTable::new(vec![
            JobSpec { name: "x".into(), arrival: 0, priority: 1, exec_time: 4 },
            JobSpec { name: "y".into(), arrival: 1, priority: 2, exec_time: 2 },
        ]);
        RunReport::new(2, &table)
    }

    fn slice(start: Ticks, job: usize, duration: Ticks, outcome: SliceOutcome) -> Slice {
        Slice {
            start,
            job,
            name: if job == 0 { "x".into() } else { "y".into() },
            duration,
            outcome,
        }
    }

    #[test]
    fn records_slices_and_derives_times() {
        let mut r = report();
        r.record_slice(&slice(0, 0, 2, SliceOutcome::Preempted));
        r.record_slice(&slice(2, 0, 2, SliceOutcome::Completed));
        r.record_slice(&slice(4, 1, 2, SliceOutcome::Completed));

        let x = &r.jobs[0];
        assert_eq!(x.first_run, Some(0));
        assert_eq!(x.completion, Some(4));
        assert_eq!(x.slices, 2);
        assert_eq!(x.preemptions, 1);
        assert_eq!(x.turnaround(), Some(4));
        assert_eq!(x.waiting(), Some(0));

        let y = &r.jobs[1];
        assert_eq!(y.response(), Some(3));
        assert_eq!(y.turnaround(), Some(5));
        assert_eq!(y.waiting(), Some(3));

        assert_eq!(r.run_time(0), 4);
        assert_eq!(r.run_time(1), 2);
    }

    #[test]
    fn unfinished_job_has_no_derived_times() {
        let r = report();
        assert_eq!(r.jobs[0].turnaround(), None);
        assert_eq!(r.jobs[0].waiting(), None);
        assert_eq!(r.jobs[0].response(), None);
    }

    #[test]
    fn writes_json() {
        let mut r = report();
        r.record_idle();
        r.record_slice(&slice(1, 0, 2, SliceOutcome::Preempted));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        r.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["quantum"], 2);
        assert_eq!(value["idle_ticks"], 1);
        assert_eq!(value["timeline"][0]["outcome"], "preempted");
        assert_eq!(value["jobs"][1]["name"], "y");
    }
}
