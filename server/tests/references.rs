//! Integration tests for the reference catalogs (publishers, languages)
//! and the staff dashboard.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_publisher_crud() {
    let server = setup_test_server().await;
    let token = librarian_token();

    let (status, publisher) = send(
        &server.router,
        Method::POST,
        "/api/v1/publishers",
        Some(&token),
        Some(json!({ "name": "Editorial Andina", "city": "Lima" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(publisher["country"], "Perú");
    let id = publisher["id"].as_i64().unwrap();

    // Duplicate name is a field error
    let (status, body) = send(
        &server.router,
        Method::POST,
        "/api/v1/publishers",
        Some(&token),
        Some(json!({ "name": "Editorial Andina" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["name"].is_string());

    let (status, updated) = send(
        &server.router,
        Method::PUT,
        &format!("/api/v1/publishers/{id}"),
        Some(&token),
        Some(json!({ "name": "Editorial Andina", "website": "https://andina.pe" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["website"], "https://andina.pe");

    let (status, body) = send(&server.router, Method::GET, "/api/v1/publishers", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_publisher_delete_is_admin_only() {
    let server = setup_test_server().await;
    let admin = admin_token();
    let librarian = librarian_token();

    let (_, publisher) = send(
        &server.router,
        Method::POST,
        "/api/v1/publishers",
        Some(&librarian),
        Some(json!({ "name": "Fugaz" })),
    )
    .await;
    let uri = format!("/api/v1/publishers/{}", publisher["id"]);

    let (status, _) = send(&server.router, Method::DELETE, &uri, Some(&librarian), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&server.router, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&server.router, Method::GET, "/api/v1/publishers", Some(&admin), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_language_delete_blocked_while_in_use() {
    let server = setup_test_server().await;
    let admin = admin_token();

    let book = create_book(&server.router, &admin, book_payload("En Español", "978-300")).await;

    let (status, body) = send(
        &server.router,
        Method::DELETE,
        "/api/v1/languages/es",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("books"));

    // Soft-deleting the book releases the language
    let (status, _) = send(
        &server.router,
        Method::DELETE,
        &format!("/api/v1/books/{}", book["id"]),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &server.router,
        Method::DELETE,
        "/api/v1/languages/es",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_language_create_validates_code() {
    let server = setup_test_server().await;
    let token = admin_token();

    let (status, body) = send(
        &server.router,
        Method::POST,
        "/api/v1/languages",
        Some(&token),
        Some(json!({ "code": "es", "name": "Español" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "seeded code must collide");
    assert!(body["errors"]["code"].is_string());

    let (status, language) = send(
        &server.router,
        Method::POST,
        "/api/v1/languages",
        Some(&token),
        Some(json!({ "code": "qu", "name": "Quechua", "native_name": "Runasimi" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(language["native_name"], "Runasimi");
}

#[tokio::test]
async fn test_dashboard_stats_are_staff_only() {
    let server = setup_test_server().await;
    let admin = admin_token();
    let member = member_token();

    create_book(&server.router, &admin, book_payload("Contado", "978-310")).await;
    create_category(&server.router, &admin, json!({ "name": "Contada" })).await;

    let (status, _) = send(
        &server.router,
        Method::GET,
        "/api/v1/dashboard/stats",
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = send(
        &server.router,
        Method::GET,
        "/api/v1/dashboard/stats",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_books"], 1);
    assert_eq!(stats["active_books"], 1);
    assert_eq!(stats["total_categories"], 1);
    assert_eq!(stats["total_users"], 0);
}
