//! preempt — single-core preemptive priority scheduler.
//!
//! Reads a jobs file, runs every job to completion one quantum at a time and
//! writes lifecycle events to the scheduler log. `preempt job <NAME>` is the
//! worker mode each spawned job is relaunched in.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use preempt_core::config::{self, Config};
use preempt_core::JobFile;
use preempt_scheduler::scheduler::{
    Clock, FileEventLog, ProcessWorkload, RunReport, Scheduler, SchedulerError,
    SimulatedWorkload, VirtualClock, WallClock, Workload,
};
use preempt_scheduler::worker;

// ── CLI ─────────────────────────────────────────────────────────────

/// Preemptive priority scheduler over OS processes.
#[derive(Parser, Debug)]
#[command(name = "preempt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Jobs file (first line: `<keyword> <quantum>`).
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Event log path.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Wall-clock milliseconds per time unit.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Append to the event log instead of truncating it.
    #[arg(long)]
    append_log: bool,

    /// Fail on malformed job lines instead of stopping ingestion.
    #[arg(long)]
    strict: bool,

    /// Use simulated jobs and a virtual clock instead of real processes.
    #[arg(long)]
    simulate: bool,

    /// Program to launch as `<program> job <name>` (defaults to this binary).
    #[arg(long)]
    worker_program: Option<PathBuf>,

    /// Write a JSON run report here.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run as the placeholder workload for one job.
    Job {
        /// Job name. Taken verbatim, even when it starts with `-`.
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
}

impl Cli {
    /// Layer command-line flags over the environment config.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(jobs) = &self.jobs {
            config.jobs_path = jobs.clone();
        }
        if let Some(log) = &self.log {
            config.log_path = log.clone();
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if let Some(program) = &self.worker_program {
            config.worker_program = Some(program.clone());
        }
        if let Some(report) = &self.report {
            config.report_path = Some(report.clone());
        }
        config.append_log |= self.append_log;
        config.strict |= self.strict;
        config.simulate |= self.simulate;
        config
    }
}

// ── Main ────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    config::load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Command::Job { name }) => run_worker(name),
        None => run_scheduler(cli.apply(Config::from_env())),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_worker(name: &str) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start worker runtime")?;
    runtime.block_on(worker::run_job(name))?;
    Ok(())
}

fn run_scheduler(config: Config) -> anyhow::Result<()> {
    config.log_summary();

    let job_file = JobFile::load(&config.jobs_path, config.strict)?;
    let log = FileEventLog::open(&config.log_path, config.append_log)?;

    let report = if config.simulate {
        schedule(job_file, SimulatedWorkload::default(), VirtualClock::new(), log)?
    } else {
        let workload = match &config.worker_program {
            Some(program) => ProcessWorkload::new(program),
            None => ProcessWorkload::current_exe()
                .context("failed to locate the current executable")?,
        };
        info!(program = %workload.program().display(), "launching jobs as processes");
        schedule(job_file, workload, WallClock::new(config.tick()), log)?
    };

    report.log_summary();
    if let Some(path) = &config.report_path {
        report.write_json(path)?;
        info!(path = %path.display(), "run report written");
    }
    Ok(())
}

fn schedule<W: Workload, C: Clock>(
    job_file: JobFile,
    workload: W,
    clock: C,
    log: FileEventLog,
) -> Result<RunReport, SchedulerError> {
    Scheduler::new(job_file, workload, clock, log).run()
}
