use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreemptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error opening {}: {source}", path.display())]
    JobsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading time slice: missing header line")]
    MissingQuantum,

    #[error("Error reading time slice: {0:?} is not a positive integer")]
    InvalidQuantum(String),

    #[error("Malformed job at line {line}: {content:?}")]
    MalformedJob { line: usize, content: String },

    #[error("Error opening {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PreemptError>;
