use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a job in the table. Equal to its position in the input file.
pub type JobId = usize;

/// Simulated time units.
pub type Ticks = u64;

/// Lifecycle state of a job's execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobState {
    /// No execution context exists yet.
    Unspawned,
    /// The execution context is live and being given the CPU.
    Running,
    /// The execution context exists but is suspended.
    Stopped,
    /// The execution context has been ended and reaped.
    Terminated,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Unspawned => "unspawned",
            JobState::Running => "running",
            JobState::Stopped => "stopped",
            JobState::Terminated => "terminated",
        };
        f.write_str(s)
    }
}

/// A transition requested of the execution controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Spawn,
    Resume,
    Pause,
    Terminate,
}

impl Action {
    /// State a job must be in for this action to be legal.
    pub fn required_state(self) -> JobState {
        match self {
            Action::Spawn => JobState::Unspawned,
            Action::Resume => JobState::Stopped,
            Action::Pause | Action::Terminate => JobState::Running,
        }
    }

    /// State the job is in after the action.
    pub fn resulting_state(self) -> JobState {
        match self {
            Action::Spawn | Action::Resume => JobState::Running,
            Action::Pause => JobState::Stopped,
            Action::Terminate => JobState::Terminated,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Spawn => "spawn",
            Action::Resume => "resume",
            Action::Pause => "pause",
            Action::Terminate => "terminate",
        };
        f.write_str(s)
    }
}

/// How a time slice ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceOutcome {
    /// Quantum expired with work remaining; the job was paused.
    Preempted,
    /// The job used up its remaining time and was terminated.
    Completed,
}

/// One contiguous run of a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    /// Simulated time at which the slice started.
    pub start: Ticks,
    pub job: JobId,
    pub name: String,
    pub duration: Ticks,
    pub outcome: SliceOutcome,
}

/// What a single scheduling iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Nothing was ready at `at`; time advanced by one unit.
    Idle { at: Ticks },
    /// A job was given the CPU.
    Ran(Slice),
}
