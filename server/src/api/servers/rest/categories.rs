//! Category management handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, FixedOffset};
use entity::category;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_middleware::AuthenticatedUser;
use crate::modules::catalog::categories::{
    CategoryFilters, CategoryInput, CategoryService, CategoryStats, CategoryWithRelations,
    OptionFilters,
};
use crate::modules::catalog::Page;

use super::read_multipart;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    pub page: Option<u64>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i32>,
    pub parent: Option<CategoryRef>,
    pub children: Vec<CategoryRef>,
    pub sort_order: i32,
    pub is_active: bool,
    pub image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<CategoryWithRelations> for CategoryResponse {
    fn from(loaded: CategoryWithRelations) -> Self {
        let category = loaded.category;
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            parent_id: category.parent_id,
            parent: loaded.parent.map(|p| CategoryRef {
                id: p.id,
                name: p.name,
            }),
            children: loaded
                .children
                .into_iter()
                .map(|c| CategoryRef {
                    id: c.id,
                    name: c.name,
                })
                .collect(),
            sort_order: category.sort_order,
            is_active: category.is_active,
            image: category.image,
            meta_title: category.meta_title,
            meta_description: category.meta_description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryOptionResponse {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

impl From<category::Model> for CategoryOptionResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            parent_id: model.parent_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryStatsResponse {
    pub total_categories: u64,
    pub parent_categories: u64,
    pub child_categories: u64,
    pub active_categories: u64,
}

impl From<CategoryStats> for CategoryStatsResponse {
    fn from(stats: CategoryStats) -> Self {
        Self {
            total_categories: stats.total_categories,
            parent_categories: stats.parent_categories,
            child_categories: stats.child_categories,
            active_categories: stats.active_categories,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Page<CategoryResponse>,
    pub parent_categories: Vec<CategoryOptionResponse>,
    pub stats: CategoryStatsResponse,
}

// ============================================================================
// Handlers (Thin Controllers)
// ============================================================================

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<CategoryListQuery>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let service = CategoryService::new(&state.db, &state.storage);

    let filters = CategoryFilters {
        search: params.search,
        kind: params.kind,
        status: params.status,
    };

    let page = service
        .list(&user, &filters, params.page.unwrap_or(1))
        .await?;
    let stats = service.stats().await?;
    let parents = service
        .options(&OptionFilters {
            parent_only: true,
            parent_id: None,
        })
        .await?;

    Ok(Json(CategoryListResponse {
        categories: page.map(CategoryResponse::from),
        parent_categories: parents.into_iter().map(Into::into).collect(),
        stats: stats.into(),
    }))
}

/// GET /api/v1/categories/options
pub async fn options(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Query(filters): Query<OptionFilters>,
) -> Result<Json<Vec<CategoryOptionResponse>>, ApiError> {
    let service = CategoryService::new(&state.db, &state.storage);
    let categories = service.options(&filters).await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/categories/{id}
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let service = CategoryService::new(&state.db, &state.storage);
    let category = service.get(&user, id).await?;

    Ok(Json(category.into()))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let mut payload = read_multipart(multipart).await?;
    let input: CategoryInput = payload.parse_data()?;
    let image = payload.take_file("image");

    let service = CategoryService::new(&state.db, &state.storage);
    let category = service.create(&user, input, image).await?;

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<CategoryResponse>, ApiError> {
    let mut payload = read_multipart(multipart).await?;
    let input: CategoryInput = payload.parse_data()?;
    let image = payload.take_file("image");

    let service = CategoryService::new(&state.db, &state.storage);
    let category = service.update(&user, id, input, image).await?;

    Ok(Json(category.into()))
}

/// DELETE /api/v1/categories/{id}
pub async fn destroy(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = CategoryService::new(&state.db, &state.storage);
    service.delete(&user, id).await?;

    Ok(Json(
        json!({ "success": true, "message": format!("Category {} deleted", id) }),
    ))
}

/// POST /api/v1/categories/{id}/toggle-status
pub async fn toggle_status(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = CategoryService::new(&state.db, &state.storage);
    let category = service.toggle_active(&user, id).await?;

    Ok(Json(
        json!({ "success": true, "is_active": category.is_active }),
    ))
}
