//! Next-job selection.
//!
//! Jobs are ranked by priority, then arrival, then remaining time, then input
//! order, ascending. The job that ran last is sticky: it keeps the CPU unless
//! another ready job strictly outranks it on priority, arrival or remaining
//! time. Input order only breaks ties between challengers.

use std::cmp::Ordering;

use super::state::{Job, JobTable};
use super::types::{JobId, Ticks};

/// Comparator key without the final input-order tie-break.
fn standing(job: &Job) -> (i64, Ticks, Ticks) {
    (job.priority, job.arrival, job.remaining)
}

/// Total order over jobs: `Less` means `a` is preferred.
pub fn compare(a: &Job, b: &Job) -> Ordering {
    standing(a)
        .cmp(&standing(b))
        .then_with(|| a.order.cmp(&b.order))
}

/// Comparator-best job among `candidates`.
fn best(table: &JobTable, candidates: impl Iterator<Item = JobId>) -> Option<JobId> {
    candidates.min_by(|&a, &b| compare(table.job(a), table.job(b)))
}

/// Pick the next job to run from `ready`, or `None` when nothing is ready.
///
/// Unlike [`compare`], eviction of `previous` ignores input order.
pub fn select(table: &JobTable, ready: &[JobId], previous: Option<JobId>) -> Option<JobId> {
    let incumbent = previous.filter(|id| ready.contains(id));
    match incumbent {
        Some(incumbent) if ready.len() > 1 => {
            let challenger = best(table, ready.iter().copied().filter(|&id| id != incumbent));
            match challenger {
                Some(challenger)
                    if standing(table.job(challenger)) < standing(table.job(incumbent)) =>
                {
                    Some(challenger)
                }
                _ => Some(incumbent),
            }
        }
        _ => best(table, ready.iter().copied()),
    }
}
