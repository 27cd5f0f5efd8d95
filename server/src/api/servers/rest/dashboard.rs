//! Staff dashboard handlers.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_middleware::AuthenticatedUser;
use crate::modules::catalog::dashboard::DashboardService;

#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub total_books: u64,
    pub active_books: u64,
    pub featured_books: u64,
    pub total_users: u64,
    pub active_users: u64,
    pub total_categories: u64,
    pub total_publishers: u64,
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<DashboardStatsResponse>, ApiError> {
    let service = DashboardService::new(&state.db);
    let stats = service.stats(&user).await?;

    Ok(Json(DashboardStatsResponse {
        total_books: stats.total_books,
        active_books: stats.active_books,
        featured_books: stats.featured_books,
        total_users: stats.total_users,
        active_users: stats.active_users,
        total_categories: stats.total_categories,
        total_publishers: stats.total_publishers,
    }))
}
