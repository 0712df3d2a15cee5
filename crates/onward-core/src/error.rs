use thiserror::Error;

use crate::migration::Version;

/// Core error type for onward operations.
#[derive(Error, Debug)]
pub enum OnwardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote versions have no local migration: {versions:?}")]
    OrphanedVersions { versions: Vec<Version> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl OnwardError {
    /// Whether the failure came from the database rather than local input.
    pub fn is_database(&self) -> bool {
        matches!(self, OnwardError::Database(_) | OnwardError::Sql(_))
    }
}

/// Result type alias using OnwardError.
pub type Result<T> = std::result::Result<T, OnwardError>;
