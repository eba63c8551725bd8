//! Worker mode: the placeholder workload a spawned job runs.
//!
//! The process announces itself on stdout and then does no real work until
//! the scheduler terminates it. SIGSTOP/SIGCONT suspend and continue it
//! without any cooperation from this side.

use std::io::{self, Write};

use tracing::info;

/// Startup line printed by a worker.
pub fn banner(name: &str, pid: u32) -> String {
    format!("Job {name} started (PID: {pid})")
}

/// Run the placeholder workload for `name` until SIGTERM or SIGINT.
pub async fn run_job(name: &str) -> io::Result<()> {
    let pid = std::process::id();
    {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", banner(name, pid))?;
        out.flush()?;
    }

    shutdown_signal().await?;
    info!(job = name, pid, "worker received shutdown signal");
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
