//! Catalog service layer.
//!
//! Services encapsulate authorization, validation and the slug/relation
//! synchronization rules, keeping REST handlers thin and focused on HTTP
//! concerns.

pub mod books;
pub mod categories;
pub mod dashboard;
pub mod references;
pub mod slug;
pub mod validation;

use sea_orm::DbErr;
use serde::Serialize;

pub use validation::FieldErrors;

/// Errors that can occur in catalog service operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Field-level validation failures; nothing was written.
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Opaque permission failure; carries no detail about required roles.
    #[error("Permission denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    /// Business-rule rejection with a single user-facing message.
    #[error("{0}")]
    BusinessRule(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// One page of results plus the markers listing clients need.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
            last_page: self.last_page,
        }
    }
}
