//! REST API router configuration.
//!
//! This module contains route definitions, server startup logic and the
//! multipart plumbing shared by the upload-carrying handlers. All handler
//! implementations are in their respective submodules.

mod books;
mod catalog;
mod categories;
mod dashboard;
mod health;
mod languages;
mod publishers;

use std::collections::HashMap;

use axum::extract::{DefaultBodyLimit, Multipart};
use axum::routing::{get, post};
use axum::Router;
use errors::AppError;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use serde::de::DeserializeOwned;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::bootstrap::config::Config;
use crate::modules::catalog::validation::MAX_PDF_BYTES;
use crate::modules::catalog::ServiceError;
use crate::modules::storage::UploadedFile;

/// Build the REST API router with all routes.
pub fn build_router(app_state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(config);
    let api = "/api/v1";

    Router::new()
        // Health
        .route(&format!("{api}/health"), get(health::check))
        // Public catalog
        .route(&format!("{api}/catalog/books"), get(catalog::list_books))
        .route(
            &format!("{api}/catalog/books/{{slug}}"),
            get(catalog::get_book),
        )
        // Dashboard
        .route(&format!("{api}/dashboard/stats"), get(dashboard::stats))
        // Books
        .route(
            &format!("{api}/books"),
            get(books::list).post(books::create),
        )
        .route(
            &format!("{api}/books/{{id}}"),
            get(books::get).put(books::update).delete(books::destroy),
        )
        .route(
            &format!("{api}/books/{{id}}/toggle-status"),
            post(books::toggle_status),
        )
        .route(
            &format!("{api}/books/{{id}}/toggle-featured"),
            post(books::toggle_featured),
        )
        // Categories (options before {id} so "options" is not read as an id)
        .route(
            &format!("{api}/categories"),
            get(categories::list).post(categories::create),
        )
        .route(
            &format!("{api}/categories/options"),
            get(categories::options),
        )
        .route(
            &format!("{api}/categories/{{id}}"),
            get(categories::get)
                .put(categories::update)
                .delete(categories::destroy),
        )
        .route(
            &format!("{api}/categories/{{id}}/toggle-status"),
            post(categories::toggle_status),
        )
        // Reference catalogs
        .route(
            &format!("{api}/publishers"),
            get(publishers::list).post(publishers::create),
        )
        .route(
            &format!("{api}/publishers/{{id}}"),
            axum::routing::put(publishers::update).delete(publishers::destroy),
        )
        .route(
            &format!("{api}/languages"),
            get(languages::list).post(languages::create),
        )
        .route(
            &format!("{api}/languages/{{code}}"),
            axum::routing::put(languages::update).delete(languages::destroy),
        )
        // PDFs up to 50 MiB must fit through the body limit
        .layer(DefaultBodyLimit::max(MAX_PDF_BYTES + 1024 * 1024))
        .with_state(app_state)
        .layer(cors)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, ACCEPT, CONTENT_TYPE, AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    if config.cors.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors
}

/// Start the REST server.
pub async fn start(app_state: &AppState, config: &Config) -> Result<(), AppError> {
    let app = build_router(app_state.clone(), config);
    let bind_addr = format!("0.0.0.0:{}", config.server.rest_port);

    info!("Starting REST server on {}", &bind_addr);
    info!("CORS allowed origins: {:?}", config.cors.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Conversion
// ============================================================================

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => ApiError::internal(e.to_string()),
            ServiceError::Validation(errors) => ApiError::Validation(errors.into_map()),
            ServiceError::Forbidden => ApiError::Forbidden,
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::BusinessRule(msg) => ApiError::Conflict(msg),
            ServiceError::Storage(e) => ApiError::internal(e.to_string()),
        }
    }
}

// ============================================================================
// Multipart plumbing
// ============================================================================

/// A parsed multipart request: the `data` JSON part plus any file parts,
/// keyed by field name.
pub(crate) struct MultipartPayload {
    data: Option<String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartPayload {
    /// Deserialize the `data` part into the target payload type.
    pub(crate) fn parse_data<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let raw = self
            .data
            .as_deref()
            .ok_or_else(|| ApiError::validation("data", "The data field is required"))?;

        serde_json::from_str(raw)
            .map_err(|e| ApiError::validation("data", format!("Invalid payload: {e}")))
    }

    pub(crate) fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

pub(crate) async fn read_multipart(mut multipart: Multipart) -> Result<MultipartPayload, ApiError> {
    let mut data: Option<String> = None;
    let mut files: HashMap<String, UploadedFile> = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation("data", format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "data" {
            data = Some(field.text().await.map_err(|e| {
                ApiError::validation("data", format!("Failed to read data field: {e}"))
            })?);
        } else {
            let original_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| {
                    ApiError::validation(name.clone(), format!("Failed to read file: {e}"))
                })?
                .to_vec();

            files.insert(
                name,
                UploadedFile {
                    original_name,
                    content_type,
                    bytes,
                },
            );
        }
    }

    Ok(MultipartPayload { data, files })
}
