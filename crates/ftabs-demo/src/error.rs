#![forbid(unsafe_code)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the demo CLI.
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ftabs(#[from] ftabs::Error),

    #[error("JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output: {0}")]
    Output(#[from] std::io::Error),

    #[error("{0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, DemoError>;

impl DemoError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code: 2 for usage errors, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid(_) => 2,
            _ => 1,
        }
    }
}
