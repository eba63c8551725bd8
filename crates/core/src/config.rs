use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Run settings for the scheduler binary.
///
/// Built from `PREEMPT_*` environment variables (call `load_dotenv()` first);
/// command-line flags are layered on top by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Jobs file with the time slice header and job lines.
    #[serde(default = "default_jobs_path")]
    pub jobs_path: PathBuf,
    /// Event log written during the run.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,
    /// Wall-clock milliseconds per simulated time unit.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Append to an existing event log instead of truncating it.
    #[serde(default)]
    pub append_log: bool,
    /// Fail on the first malformed job line instead of stopping ingestion there.
    #[serde(default)]
    pub strict: bool,
    /// Run with in-process simulated jobs and a virtual clock.
    #[serde(default)]
    pub simulate: bool,
    /// Program relaunched as `<program> job <name>`. None = current executable.
    #[serde(default)]
    pub worker_program: Option<PathBuf>,
    /// Where to write the JSON run report, if anywhere.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

fn default_jobs_path() -> PathBuf { PathBuf::from("jobs.txt") }
fn default_log_path() -> PathBuf { PathBuf::from("scheduler.log") }
fn default_tick_ms() -> u64 { 1000 }

impl Default for Config {
    fn default() -> Self {
        Self {
            jobs_path: default_jobs_path(),
            log_path: default_log_path(),
            tick_ms: default_tick_ms(),
            append_log: false,
            strict: false,
            simulate: false,
            worker_program: None,
            report_path: None,
        }
    }
}

impl Config {
    /// Build config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let flag = |key: &str| {
            get(key)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        Self {
            jobs_path: get("PREEMPT_JOBS").map(PathBuf::from).unwrap_or_else(default_jobs_path),
            log_path: get("PREEMPT_LOG").map(PathBuf::from).unwrap_or_else(default_log_path),
            tick_ms: get("PREEMPT_TICK_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_tick_ms),
            append_log: flag("PREEMPT_APPEND_LOG"),
            strict: flag("PREEMPT_STRICT"),
            simulate: flag("PREEMPT_SIMULATE"),
            worker_program: get("PREEMPT_WORKER_PROGRAM").map(PathBuf::from),
            report_path: get("PREEMPT_REPORT").map(PathBuf::from),
        }
    }

    /// Wall-clock duration of one simulated time unit.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  jobs:     {}", self.jobs_path.display());
        tracing::info!(
            "  log:      {} ({})",
            self.log_path.display(),
            if self.append_log { "append" } else { "truncate" }
        );
        tracing::info!("  tick:     {}ms", self.tick_ms);
        tracing::info!(
            "  mode:     {}{}",
            if self.simulate { "simulated" } else { "process" },
            if self.strict { ", strict parsing" } else { "" }
        );
        if let Some(report) = &self.report_path {
            tracing::info!("  report:   {}", report.display());
        }
    }
}
