use std::io;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::{debug, warn};

use crate::scheduler::task::{ExecutionHandle, Workload};

/// Starts each job as `<program> job <name>` in its own OS process.
#[derive(Debug, Clone)]
pub struct ProcessWorkload {
    program: PathBuf,
}

impl ProcessWorkload {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Relaunch the currently running executable in worker mode.
    pub fn current_exe() -> io::Result<Self> {
        std::env::current_exe().map(Self::new)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Workload for ProcessWorkload {
    fn start(&mut self, name: &str) -> io::Result<Box<dyn ExecutionHandle>> {
        let child = Command::new(&self.program)
            .arg("job")
            .arg(name)
            .stdin(Stdio::null())
            .spawn()?;
        debug!(job = name, pid = child.id(), "spawned worker process");
        Ok(Box::new(ProcessHandle {
            child,
            reaped: false,
        }))
    }
}

/// A child process driven with job-control signals.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    reaped: bool,
}

impl ProcessHandle {
    /// Deliver a signal by name through the `kill` utility.
    #[cfg(unix)]
    fn signal(&self, name: &str) -> io::Result<()> {
        let pid = self.child.id().to_string();
        let status = Command::new("kill")
            .args([format!("-{name}").as_str(), pid.as_str()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::other(format!(
                "kill -{name} {pid} exited with {status}"
            )))
        }
    }

    #[cfg(not(unix))]
    fn signal(&self, name: &str) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("SIG{name} is not available on this platform"),
        ))
    }
}

impl ExecutionHandle for ProcessHandle {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn pause(&mut self) -> io::Result<()> {
        self.signal("STOP")
    }

    fn resume(&mut self) -> io::Result<()> {
        self.signal("CONT")
    }

    #[cfg(unix)]
    fn terminate(&mut self) -> io::Result<()> {
        self.signal("TERM")
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) -> io::Result<()> {
        self.child.kill()
    }

    fn wait(&mut self) -> io::Result<()> {
        let status = self.child.wait()?;
        self.reaped = true;
        debug!(pid = self.child.id(), %status, "worker process reaped");
        Ok(())
    }
}

impl Drop for ProcessHandle {
    // Only reached when the run aborts with this child still alive.
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        let pid = self.child.id();
        if let Err(e) = self.child.kill().and_then(|_| self.child.wait().map(|_| ())) {
            warn!(pid, error = %e, "failed to clean up worker process");
        }
    }
}
