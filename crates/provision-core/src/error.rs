//! Unified error types for provision core.

use serde::Serialize;
use thiserror::Error;

use crate::modules::repository::RepositoryError;

/// Startup error type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Device store operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Database connection failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for provision operations.
pub type AppResult<T> = Result<T, AppError>;
