//! Publisher reference-catalog handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use entity::publisher;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_middleware::AuthenticatedUser;
use crate::modules::catalog::references::{PublisherInput, PublisherService};

#[derive(Debug, Serialize)]
pub struct PublisherResponse {
    pub id: i32,
    pub name: String,
    pub city: Option<String>,
    pub country: String,
    pub website: Option<String>,
    pub is_active: bool,
}

impl From<publisher::Model> for PublisherResponse {
    fn from(model: publisher::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            city: model.city,
            country: model.country,
            website: model.website,
            is_active: model.is_active,
        }
    }
}

/// GET /api/v1/publishers
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<PublisherResponse>>, ApiError> {
    let service = PublisherService::new(&state.db);
    let publishers = service.list(&user).await?;

    Ok(Json(publishers.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/publishers
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(input): Json<PublisherInput>,
) -> Result<(StatusCode, Json<PublisherResponse>), ApiError> {
    let service = PublisherService::new(&state.db);
    let publisher = service.create(&user, input).await?;

    Ok((StatusCode::CREATED, Json(publisher.into())))
}

/// PUT /api/v1/publishers/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(input): Json<PublisherInput>,
) -> Result<Json<PublisherResponse>, ApiError> {
    let service = PublisherService::new(&state.db);
    let publisher = service.update(&user, id, input).await?;

    Ok(Json(publisher.into()))
}

/// DELETE /api/v1/publishers/{id}
pub async fn destroy(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = PublisherService::new(&state.db);
    service.delete(&user, id).await?;

    Ok(Json(
        json!({ "success": true, "message": format!("Publisher {} deleted", id) }),
    ))
}
