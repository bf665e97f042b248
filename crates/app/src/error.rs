//! Application error type.

use domain::{RepositoryError, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the application layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A domain rule rejected the request.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Connecting to the database failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl AppError {
    /// Returns true if a referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_not_found())
    }
}
