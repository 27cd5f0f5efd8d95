//! Integration tests for the public catalog and health endpoints.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_health_check() {
    let server = setup_test_server().await;

    let (status, body) = send(&server.router, Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_public_list_shows_only_active_books() {
    let server = setup_test_server().await;
    let token = admin_token();

    create_book(&server.router, &token, book_payload("Visible", "978-200")).await;
    let mut hidden = book_payload("Oculto", "978-201");
    hidden["is_active"] = json!(false);
    create_book(&server.router, &token, hidden).await;

    // No token required
    let (status, body) = send(&server.router, Method::GET, "/api/v1/catalog/books", None, None).await;

    assert_eq!(status, StatusCode::OK);
    let items = body["books"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Visible");
}

#[tokio::test]
async fn test_public_get_by_slug_counts_views() {
    let server = setup_test_server().await;
    let token = admin_token();

    create_book(&server.router, &token, book_payload("Popular", "978-210")).await;

    let (status, first) = send(
        &server.router,
        Method::GET,
        "/api/v1/catalog/books/popular",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total_views"], 1);

    let (_, second) = send(
        &server.router,
        Method::GET,
        "/api/v1/catalog/books/popular",
        None,
        None,
    )
    .await;
    assert_eq!(second["total_views"], 2);
}

#[tokio::test]
async fn test_public_unknown_or_inactive_slug_is_not_found() {
    let server = setup_test_server().await;
    let token = admin_token();

    let mut hidden = book_payload("Retirado", "978-220");
    hidden["is_active"] = json!(false);
    create_book(&server.router, &token, hidden).await;

    let (status, _) = send(
        &server.router,
        Method::GET,
        "/api/v1/catalog/books/retirado",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &server.router,
        Method::GET,
        "/api/v1/catalog/books/no-existe",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_search_filter() {
    let server = setup_test_server().await;
    let token = admin_token();

    create_book(&server.router, &token, book_payload("Mar Adentro", "978-230")).await;
    create_book(&server.router, &token, book_payload("Sierra Alta", "978-231")).await;

    let (status, body) = send(
        &server.router,
        Method::GET,
        "/api/v1/catalog/books?search=Mar",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let items = body["books"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Mar Adentro");
}
