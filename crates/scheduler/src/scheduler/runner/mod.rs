//! The scheduling loop.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, constructor, and accessor methods
//! - `execution`: single-iteration `step` and the run-to-completion loop
//! - `scheduling`: next-job selection over the current ready set

mod core;
mod execution;
mod scheduling;

pub use self::core::Scheduler;
