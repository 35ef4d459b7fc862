use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClasificaError {
    #[error("Rule source unavailable ({}): {reason}", .path.display())]
    RuleSourceUnavailable { path: PathBuf, reason: String },

    #[error("Rule source malformed ({}): {reason}", .path.display())]
    RuleSourceMalformed { path: PathBuf, reason: String },

    #[error("Cannot read input directory {}: {source}", .path.display())]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open {}: {source}", .path.display())]
    FileOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}: {reason}", .path.display())]
    OutputWriteFailed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl ClasificaError {
    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RuleSourceUnavailable { .. } => 2,
            Self::RuleSourceMalformed { .. } => 3,
            Self::InputDirUnreadable { .. } => 4,
            Self::OutputWriteFailed { .. } => 5,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClasificaError>;
