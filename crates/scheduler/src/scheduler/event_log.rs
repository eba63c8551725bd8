//! The scheduler event log.
//!
//! One line per lifecycle event, `[YYYY-MM-DD HH:MM:SS] [INFO] <message>`,
//! kept separate from `tracing` diagnostics so its format stays fixed.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local, TimeZone};
use preempt_core::PreemptError;

use super::task::SchedulerError;
use super::types::Ticks;

/// Upper-case the first character of a job name.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A lifecycle event written to the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    Forking { name: &'a str },
    Executing { name: &'a str, pid: u32 },
    Resuming { name: &'a str, pid: u32 },
    SliceExpired { name: &'a str, ran: Ticks },
    Completed { name: &'a str, pid: u32 },
}

impl fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Event::Forking { name } => write!(f, "Forking new process for {name}"),
            Event::Executing { name, pid } => {
                write!(f, "Executing {name} (PID: {pid}) using exec")
            }
            Event::Resuming { name, pid } => write!(f, "Resuming {name} (PID: {pid}) - SIGCONT"),
            Event::SliceExpired { name, ran } => write!(
                f,
                "{} ran for {ran} seconds. Time slice expired - Sending SIGSTOP",
                capitalize(name)
            ),
            Event::Completed { name, pid } => write!(
                f,
                "{} completed execution. Terminating (PID: {pid})",
                capitalize(name)
            ),
        }
    }
}

/// Format one log line with the given timestamp.
pub fn format_line<Tz: TimeZone>(at: &DateTime<Tz>, message: &str) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("{} [INFO] {}", at.format("[%Y-%m-%d %H:%M:%S]"), message)
}

/// Sink for lifecycle events.
pub trait EventLog {
    fn record(&mut self, event: &Event<'_>) -> Result<(), SchedulerError>;
}

/// Appends timestamped lines to a file, flushing after each one.
#[derive(Debug)]
pub struct FileEventLog {
    file: File,
}

impl FileEventLog {
    /// Open the log file, truncating it unless `append` is set.
    pub fn open(path: impl AsRef<Path>, append: bool) -> Result<Self, PreemptError> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(path).map_err(|source| PreemptError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { file })
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")?;
        self.file.flush()
    }
}

impl EventLog for FileEventLog {
    fn record(&mut self, event: &Event<'_>) -> Result<(), SchedulerError> {
        let line = format_line(&Local::now(), &event.to_string());
        self.write_line(&line).map_err(SchedulerError::EventLog)
    }
}

/// Keeps messages in memory, without timestamps.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    messages: Vec<String>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl EventLog for MemoryEventLog {
    fn record(&mut self, event: &Event<'_>) -> Result<(), SchedulerError> {
        self.messages.push(event.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn capitalize_first_letter_only() {
        assert_eq!(capitalize("alpha"), "Alpha");
        assert_eq!(capitalize("Beta"), "Beta");
        assert_eq!(capitalize("job-x"), "Job-x");
        assert_eq!(capitalize("9lives"), "9lives");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn message_templates() {
        assert_eq!(
            Event::Forking { name: "alpha" }.to_string(),
            "Forking new process for alpha"
        );
        assert_eq!(
            Event::Executing { name: "alpha", pid: 42 }.to_string(),
            "Executing alpha (PID: 42) using exec"
        );
        assert_eq!(
            Event::Resuming { name: "alpha", pid: 42 }.to_string(),
            "Resuming alpha (PID: 42) - SIGCONT"
        );
        assert_eq!(
            Event::SliceExpired { name: "alpha", ran: 3 }.to_string(),
            "Alpha ran for 3 seconds. Time slice expired - Sending SIGSTOP"
        );
        assert_eq!(
            Event::Completed { name: "alpha", pid: 42 }.to_string(),
            "Alpha completed execution. Terminating (PID: 42)"
        );
    }

    #[test]
    fn line_format() {
        let at = NaiveDate::from_ymd_opt(2025, 3, 24)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
            .and_utc();
        assert_eq!(
            format_line(&at, "Forking new process for a"),
            "[2025-03-24 09:05:07] [INFO] Forking new process for a"
        );
    }

    #[test]
    fn file_log_truncates_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheduler.log");
        std::fs::write(&path, "stale line\n").unwrap();

        let mut log = FileEventLog::open(&path, false).unwrap();
        log.record(&Event::Forking { name: "a" }).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] [INFO] Forking new process for a"));
    }

    #[test]
    fn file_log_appends_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scheduler.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let mut log = FileEventLog::open(&path, true).unwrap();
        log.record(&Event::Forking { name: "a" }).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous run\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn unwritable_log_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("scheduler.log");

        let err = FileEventLog::open(&path, false).unwrap_err();
        assert!(matches!(err, PreemptError::LogFile { .. }));
    }
}
