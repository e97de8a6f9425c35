use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("Backup store unavailable at {path}: {source}")]
    Store {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl AppError {
    /// True for failures of an external tool: it could not be started, or it
    /// ran and exited non-zero.
    pub fn is_process_failure(&self) -> bool {
        matches!(self, AppError::Spawn { .. } | AppError::Command { .. })
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
