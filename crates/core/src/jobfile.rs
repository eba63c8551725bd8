use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PreemptError, Result};

/// One job description as read from the jobs file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,
    /// Simulated time before which the job is not ready.
    pub arrival: u64,
    /// Lower value = higher precedence.
    pub priority: i64,
    /// Total time units of work. Always positive.
    pub exec_time: u64,
}

impl JobSpec {
    /// Parse a `<name> <arrival> <priority> <exec_time>` line.
    ///
    /// Returns `None` when the line does not have exactly that shape, or when
    /// `exec_time` is zero.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let name = fields.next()?;
        let arrival = fields.next()?.parse().ok()?;
        let priority = fields.next()?.parse().ok()?;
        let exec_time: u64 = fields.next()?.parse().ok()?;
        if fields.next().is_some() || exec_time == 0 {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            arrival,
            priority,
            exec_time,
        })
    }
}

/// Parsed contents of a jobs file: the time slice header plus the job list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFile {
    /// Maximum time units a job may run before it is preempted.
    pub quantum: u64,
    /// Jobs in input order. A job's index here is its tie-break order.
    pub jobs: Vec<JobSpec>,
    /// 1-based line number where ingestion stopped early, if it did.
    pub truncated_at: Option<usize>,
}

impl JobFile {
    /// Read and parse a jobs file from disk.
    pub fn load(path: impl AsRef<Path>, strict: bool) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PreemptError::JobsFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, strict)
    }

    /// Parse jobs file content.
    ///
    /// The first non-blank line is `<keyword> <quantum>`; the keyword is
    /// ignored. Every following non-blank line is one job. Ingestion stops at
    /// the first line that is not a valid job, unless `strict` is set, in which
    /// case that line is reported as [`PreemptError::MalformedJob`].
    pub fn parse(content: &str, strict: bool) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(PreemptError::MissingQuantum)?;
        let quantum = parse_quantum(header)?;

        let mut jobs = Vec::new();
        let mut truncated_at = None;
        for (line_no, line) in lines {
            match JobSpec::parse_line(line) {
                Some(job) => {
                    if jobs.iter().any(|j: &JobSpec| j.name == job.name) {
                        warn!(job = %job.name, line = line_no, "duplicate job name");
                    }
                    jobs.push(job);
                }
                None if strict => {
                    return Err(PreemptError::MalformedJob {
                        line: line_no,
                        content: line.to_string(),
                    });
                }
                None => {
                    warn!(
                        line = line_no,
                        content = line,
                        "stopping job ingestion at malformed line"
                    );
                    truncated_at = Some(line_no);
                    break;
                }
            }
        }

        debug!(quantum, jobs = jobs.len(), "parsed jobs file");
        Ok(Self {
            quantum,
            jobs,
            truncated_at,
        })
    }
}

fn parse_quantum(header: &str) -> Result<u64> {
    let mut fields = header.split_whitespace();
    let _keyword = fields.next().ok_or(PreemptError::MissingQuantum)?;
    let raw = fields.next().ok_or(PreemptError::MissingQuantum)?;
    match raw.parse::<u64>() {
        Ok(quantum) if quantum > 0 => Ok(quantum),
        _ => Err(PreemptError::InvalidQuantum(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn spec(name: &str, arrival: u64, priority: i64, exec_time: u64) -> JobSpec {
        JobSpec {
            name: name.to_string(),
            arrival,
            priority,
            exec_time,
        }
    }

    #[test]
    fn parses_header_and_jobs() {
        let content = "TimeSlice 3\nA 0 1 5\nB 2 0 3\n";
        let file = JobFile::parse(content, false).unwrap();

        assert_eq!(file.quantum, 3);
        assert_eq!(file.jobs, vec![spec("A", 0, 1, 5), spec("B", 2, 0, 3)]);
        assert_eq!(file.truncated_at, None);
    }

    #[test]
    fn header_keyword_is_ignored() {
        let file = JobFile::parse("whatever 7\n", false).unwrap();
        assert_eq!(file.quantum, 7);
        assert!(file.jobs.is_empty());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let content = "\n\nTimeSlice 2\n\nA 0 1 4\n   \nB 0 2 2\n";
        let file = JobFile::parse(content, false).unwrap();
        assert_eq!(file.jobs.len(), 2);
    }

    #[test]
    fn negative_priority_is_allowed() {
        let file = JobFile::parse("TimeSlice 1\nA 0 -3 1\n", false).unwrap();
        assert_eq!(file.jobs[0].priority, -3);
    }

    #[test]
    fn malformed_line_silently_truncates_ingestion() {
        // Everything after the first bad line is dropped, even valid jobs.
        let content = "TimeSlice 2\nA 0 1 4\nB zero 1 4\nC 0 1 4\n";
        let file = JobFile::parse(content, false).unwrap();

        assert_eq!(file.jobs, vec![spec("A", 0, 1, 4)]);
        assert_eq!(file.truncated_at, Some(3));
    }

    #[test]
    fn strict_mode_reports_malformed_line() {
        let content = "TimeSlice 2\nA 0 1 4\nB 0 1\n";
        let err = JobFile::parse(content, true).unwrap_err();

        match err {
            PreemptError::MalformedJob { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "B 0 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn job_line_shape() {
        assert_eq!(JobSpec::parse_line("A 0 1 4"), Some(spec("A", 0, 1, 4)));
        assert_eq!(JobSpec::parse_line("A 0 1"), None);
        assert_eq!(JobSpec::parse_line("A 0 1 4 9"), None);
        assert_eq!(JobSpec::parse_line("A -1 1 4"), None);
        assert_eq!(JobSpec::parse_line("A 0 1 0"), None);
        assert_eq!(JobSpec::parse_line("A 0 1 -2"), None);
    }

    #[test]
    fn missing_header_is_fatal() {
        assert!(matches!(
            JobFile::parse("", false),
            Err(PreemptError::MissingQuantum)
        ));
        assert!(matches!(
            JobFile::parse("TimeSlice\n", false),
            Err(PreemptError::MissingQuantum)
        ));
    }

    #[test]
    fn invalid_quantum_is_fatal() {
        assert!(matches!(
            JobFile::parse("TimeSlice abc\n", false),
            Err(PreemptError::InvalidQuantum(q)) if q == "abc"
        ));
        assert!(matches!(
            JobFile::parse("TimeSlice 0\nA 0 1 1\n", false),
            Err(PreemptError::InvalidQuantum(q)) if q == "0"
        ));
    }

    #[test]
    fn duplicate_names_are_kept() {
        let file = JobFile::parse("TimeSlice 1\nA 0 1 1\nA 0 1 2\n", false).unwrap();
        assert_eq!(file.jobs.len(), 2);
    }

    #[test]
    fn load_from_disk() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "TimeSlice 4").unwrap();
        writeln!(tmp, "alpha 1 2 3").unwrap();

        let file = JobFile::load(tmp.path(), false).unwrap();
        assert_eq!(file.quantum, 4);
        assert_eq!(file.jobs, vec![spec("alpha", 1, 2, 3)]);
    }

    #[test]
    fn load_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.txt");

        let err = JobFile::load(&path, false).unwrap_err();
        assert!(matches!(err, PreemptError::JobsFile { .. }));
        assert!(err.to_string().contains("jobs.txt"));
    }
}
