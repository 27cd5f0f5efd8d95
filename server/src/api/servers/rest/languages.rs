//! Language reference-catalog handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use entity::language;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_middleware::AuthenticatedUser;
use crate::modules::catalog::references::{LanguageInput, LanguageService};

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub code: String,
    pub name: String,
    pub native_name: Option<String>,
    pub is_active: bool,
}

impl From<language::Model> for LanguageResponse {
    fn from(model: language::Model) -> Self {
        Self {
            code: model.code,
            name: model.name,
            native_name: model.native_name,
            is_active: model.is_active,
        }
    }
}

/// GET /api/v1/languages
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<LanguageResponse>>, ApiError> {
    let service = LanguageService::new(&state.db);
    let languages = service.list(&user).await?;

    Ok(Json(languages.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/languages
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(input): Json<LanguageInput>,
) -> Result<(StatusCode, Json<LanguageResponse>), ApiError> {
    let service = LanguageService::new(&state.db);
    let language = service.create(&user, input).await?;

    Ok((StatusCode::CREATED, Json(language.into())))
}

/// PUT /api/v1/languages/{code}
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(code): Path<String>,
    Json(input): Json<LanguageInput>,
) -> Result<Json<LanguageResponse>, ApiError> {
    let service = LanguageService::new(&state.db);
    let language = service.update(&user, &code, input).await?;

    Ok(Json(language.into()))
}

/// DELETE /api/v1/languages/{code}
pub async fn destroy(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let service = LanguageService::new(&state.db);
    service.delete(&user, &code).await?;

    Ok(Json(
        json!({ "success": true, "message": format!("Language {} deleted", code) }),
    ))
}
