//! Error types for Ripple CI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Lookup errors
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Build not found: {0}")]
    BuildNotFound(String),

    #[error("Test not found: {0}")]
    TestNotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error means "the thing you asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ProjectNotFound(_)
                | Error::PlanNotFound(_)
                | Error::SnapshotNotFound(_)
                | Error::BuildNotFound(_)
                | Error::TestNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
