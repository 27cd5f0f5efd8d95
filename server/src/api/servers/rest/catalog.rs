//! Public catalog handlers. No authentication: only active books are
//! visible here, and reading a book counts a view.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::modules::catalog::books::{BookFilters, BookService};
use crate::modules::catalog::Page;

use super::books::BookResponse;

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<u64>,
    pub search: Option<String>,
    pub category: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CatalogListResponse {
    pub books: Page<BookResponse>,
}

/// GET /api/v1/catalog/books
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<CatalogListResponse>, ApiError> {
    let service = BookService::new(&state.db, &state.storage);

    let filters = BookFilters {
        search: params.search,
        category: params.category,
        status: None,
    };

    let page = service
        .list_public(&filters, params.page.unwrap_or(1))
        .await?;

    Ok(Json(CatalogListResponse {
        books: page.map(BookResponse::from),
    }))
}

/// GET /api/v1/catalog/books/{slug}
pub async fn get_book(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let service = BookService::new(&state.db, &state.storage);
    let book = service.get_public_by_slug(&slug).await?;

    Ok(Json(book.into()))
}
