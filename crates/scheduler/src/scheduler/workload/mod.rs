//! [`Workload`](super::task::Workload) implementations.

mod process;
mod simulated;

pub use process::{ProcessHandle, ProcessWorkload};
pub use simulated::{Signal, SimulatedHandle, SimulatedWorkload};
