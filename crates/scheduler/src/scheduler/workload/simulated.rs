use std::io;
use std::sync::{Arc, Mutex};

use crate::scheduler::task::{ExecutionHandle, Workload};

/// A signal observed by a simulated execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Start { name: String, pid: u32 },
    Stop { pid: u32 },
    Cont { pid: u32 },
    Term { pid: u32 },
    Reaped { pid: u32 },
}

/// Shared, ordered record of every signal delivered to simulated jobs.
type Journal = Arc<Mutex<Vec<Signal>>>;

/// In-process stand-in for real worker processes.
///
/// Hands out sequential fake PIDs and records every operation in a shared
/// journal, read back with [`SimulatedWorkload::signals`]. Nothing runs and
/// nothing is launched.
#[derive(Debug, Clone)]
pub struct SimulatedWorkload {
    next_pid: u32,
    journal: Journal,
    fail_on: Option<String>,
}

impl Default for SimulatedWorkload {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl SimulatedWorkload {
    pub fn new(first_pid: u32) -> Self {
        Self {
            next_pid: first_pid,
            journal: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    /// Make `start` fail for the named job.
    pub fn failing_on(mut self, name: impl Into<String>) -> Self {
        self.fail_on = Some(name.into());
        self
    }

    /// Snapshot of the signals recorded so far.
    pub fn signals(&self) -> Vec<Signal> {
        self.journal.lock().map(|j| j.clone()).unwrap_or_default()
    }
}

impl Workload for SimulatedWorkload {
    fn start(&mut self, name: &str) -> io::Result<Box<dyn ExecutionHandle>> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(io::Error::other(format!("simulated start failure for {name}")));
        }
        let pid = self.next_pid;
        self.next_pid += 1;
        record(
            &self.journal,
            Signal::Start {
                name: name.to_string(),
                pid,
            },
        );
        Ok(Box::new(SimulatedHandle {
            pid,
            status: Status::Running,
            journal: Arc::clone(&self.journal),
        }))
    }
}

fn record(journal: &Journal, signal: Signal) {
    if let Ok(mut j) = journal.lock() {
        j.push(signal);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Running,
    Stopped,
    /// Terminated but not yet reaped.
    Zombie,
    Reaped,
}

/// Execution handle for a simulated job.
#[derive(Debug)]
pub struct SimulatedHandle {
    pid: u32,
    status: Status,
    journal: Journal,
}

impl SimulatedHandle {
    fn gone(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such process: {}", self.pid),
        )
    }
}

impl ExecutionHandle for SimulatedHandle {
    fn id(&self) -> u32 {
        self.pid
    }

    fn pause(&mut self) -> io::Result<()> {
        match self.status {
            Status::Reaped => Err(self.gone()),
            Status::Running | Status::Stopped => {
                self.status = Status::Stopped;
                record(&self.journal, Signal::Stop { pid: self.pid });
                Ok(())
            }
            Status::Zombie => Ok(()),
        }
    }

    fn resume(&mut self) -> io::Result<()> {
        match self.status {
            Status::Reaped => Err(self.gone()),
            Status::Running | Status::Stopped => {
                self.status = Status::Running;
                record(&self.journal, Signal::Cont { pid: self.pid });
                Ok(())
            }
            Status::Zombie => Ok(()),
        }
    }

    fn terminate(&mut self) -> io::Result<()> {
        match self.status {
            Status::Reaped => Err(self.gone()),
            _ => {
                self.status = Status::Zombie;
                record(&self.journal, Signal::Term { pid: self.pid });
                Ok(())
            }
        }
    }

    fn wait(&mut self) -> io::Result<()> {
        match self.status {
            Status::Zombie => {
                self.status = Status::Reaped;
                record(&self.journal, Signal::Reaped { pid: self.pid });
                Ok(())
            }
            Status::Reaped => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("process {} already reaped", self.pid),
            )),
            // A live job never exits on its own.
            Status::Running | Status::Stopped => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                format!("process {} has not been terminated", self.pid),
            )),
        }
    }
}
