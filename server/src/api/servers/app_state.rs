use sea_orm::DatabaseConnection;

use crate::modules::storage::FileStorage;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: FileStorage,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: FileStorage) -> Self {
        Self { db, storage }
    }
}
