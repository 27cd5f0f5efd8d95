//! Book management handlers.
//!
//! These handlers follow the thin controller pattern:
//! - Extract request parameters (JSON `data` part plus optional files)
//! - Delegate to BookService
//! - Convert to HTTP response

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::{DateTime, FixedOffset};
use entity::book::{AccessLevel, BookType, CopyrightStatus};
use entity::book_contributor::ContributorType;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_middleware::AuthenticatedUser;
use crate::modules::catalog::books::{
    BookFilters, BookInput, BookService, BookStats, BookWithRelations,
};
use crate::modules::catalog::Page;

use super::read_multipart;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BookListQuery {
    pub page: Option<u64>,
    pub search: Option<String>,
    pub category: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PublisherRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageRef {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct ContributorResponse {
    pub id: i32,
    pub contributor_type: ContributorType,
    pub full_name: String,
    pub email: Option<String>,
    pub sequence_number: i32,
    pub biographical_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub slug: String,
    pub publisher: Option<PublisherRef>,
    pub language: Option<LanguageRef>,
    pub pages: Option<i32>,
    pub publication_year: Option<i32>,
    pub cover_image: Option<String>,
    pub pdf_file: Option<String>,
    pub is_active: bool,
    pub downloadable: bool,
    pub book_type: BookType,
    pub total_downloads: i32,
    pub total_physical_copies: i32,
    pub available_physical_copies: i32,
    pub total_loans: i32,
    pub total_views: i32,
    pub featured: bool,
    pub access_level: AccessLevel,
    pub copyright_status: CopyrightStatus,
    pub license_type: Option<String>,
    pub description: Option<String>,
    pub categories: Vec<CategoryRef>,
    pub contributors: Vec<ContributorResponse>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<BookWithRelations> for BookResponse {
    fn from(loaded: BookWithRelations) -> Self {
        let book = loaded.book;
        Self {
            id: book.id,
            title: book.title,
            isbn: book.isbn,
            slug: book.slug,
            publisher: loaded.publisher.map(|p| PublisherRef {
                id: p.id,
                name: p.name,
            }),
            language: loaded.language.map(|l| LanguageRef {
                code: l.code,
                name: l.name,
            }),
            pages: book.pages,
            publication_year: book.publication_year,
            cover_image: book.cover_image,
            pdf_file: book.pdf_file,
            is_active: book.is_active,
            downloadable: book.downloadable,
            book_type: book.book_type,
            total_downloads: book.total_downloads,
            total_physical_copies: book.total_physical_copies,
            available_physical_copies: book.available_physical_copies,
            total_loans: book.total_loans,
            total_views: book.total_views,
            featured: book.featured,
            access_level: book.access_level,
            copyright_status: book.copyright_status,
            license_type: book.license_type,
            description: loaded.details.and_then(|d| d.description),
            categories: loaded
                .categories
                .into_iter()
                .map(|c| CategoryRef {
                    id: c.id,
                    name: c.name,
                    slug: c.slug,
                })
                .collect(),
            contributors: loaded
                .contributors
                .into_iter()
                .map(|c| ContributorResponse {
                    id: c.id,
                    contributor_type: c.contributor_type,
                    full_name: c.full_name,
                    email: c.email,
                    sequence_number: c.sequence_number,
                    biographical_note: c.biographical_note,
                })
                .collect(),
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookStatsResponse {
    pub total_books: u64,
    pub active_books: u64,
    pub featured_books: u64,
}

impl From<BookStats> for BookStatsResponse {
    fn from(stats: BookStats) -> Self {
        Self {
            total_books: stats.total_books,
            active_books: stats.active_books,
            featured_books: stats.featured_books,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookListResponse {
    pub books: Page<BookResponse>,
    pub stats: BookStatsResponse,
}

// ============================================================================
// Handlers (Thin Controllers)
// ============================================================================

/// GET /api/v1/books
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<BookListQuery>,
) -> Result<Json<BookListResponse>, ApiError> {
    let service = BookService::new(&state.db, &state.storage);

    let filters = BookFilters {
        search: params.search,
        category: params.category,
        status: params.status,
    };

    let page = service
        .list(&user, &filters, params.page.unwrap_or(1))
        .await?;
    let stats = service.stats().await?;

    Ok(Json(BookListResponse {
        books: page.map(BookResponse::from),
        stats: stats.into(),
    }))
}

/// GET /api/v1/books/{id}
pub async fn get(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<BookResponse>, ApiError> {
    let service = BookService::new(&state.db, &state.storage);
    let book = service.get(&user, id).await?;

    Ok(Json(book.into()))
}

/// POST /api/v1/books
pub async fn create(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let mut payload = read_multipart(multipart).await?;
    let input: BookInput = payload.parse_data()?;
    let cover = payload.take_file("cover_image");
    let pdf = payload.take_file("pdf_file");

    let service = BookService::new(&state.db, &state.storage);
    let book = service.create(&user, input, cover, pdf).await?;

    Ok((StatusCode::CREATED, Json(book.into())))
}

/// PUT /api/v1/books/{id}
pub async fn update(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<BookResponse>, ApiError> {
    let mut payload = read_multipart(multipart).await?;
    let input: BookInput = payload.parse_data()?;
    let cover = payload.take_file("cover_image");
    let pdf = payload.take_file("pdf_file");

    let service = BookService::new(&state.db, &state.storage);
    let book = service.update(&user, id, input, cover, pdf).await?;

    Ok(Json(book.into()))
}

/// DELETE /api/v1/books/{id}
pub async fn destroy(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = BookService::new(&state.db, &state.storage);
    service.delete(&user, id).await?;

    Ok(Json(
        json!({ "success": true, "message": format!("Book {} deleted", id) }),
    ))
}

/// POST /api/v1/books/{id}/toggle-status
pub async fn toggle_status(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = BookService::new(&state.db, &state.storage);
    let book = service.toggle_active(&user, id).await?;

    Ok(Json(
        json!({ "success": true, "is_active": book.is_active }),
    ))
}

/// POST /api/v1/books/{id}/toggle-featured
pub async fn toggle_featured(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let service = BookService::new(&state.db, &state.storage);
    let book = service.toggle_featured(&user, id).await?;

    Ok(Json(json!({ "success": true, "featured": book.featured })))
}
