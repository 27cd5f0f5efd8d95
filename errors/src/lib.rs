//! Shared application error type for bootstrap and infrastructure paths.
//!
//! Service-level errors live next to their services; this crate only covers
//! failures that abort startup or cross crate boundaries (database setup,
//! migrations, configuration, I/O).

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[source] BoxError),

    #[error("Migration error: {0}")]
    Migration(#[source] BoxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
