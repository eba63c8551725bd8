pub mod config;
pub mod error;
pub mod jobfile;

pub use config::Config;
pub use error::*;
pub use jobfile::{JobFile, JobSpec};
