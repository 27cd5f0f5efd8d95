//! Integration tests for book management endpoints.
//!
//! Covers slug generation and collision handling, relation synchronization
//! (category set-sync, contributor replace-all), toggles, soft delete and
//! role-based authorization.

mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_create_book_generates_slug() {
    let server = setup_test_server().await;
    let token = admin_token();

    let book = create_book(
        &server.router,
        &token,
        book_payload("El Principito", "978-0001"),
    )
    .await;

    assert_eq!(book["slug"], "el-principito");
    assert_eq!(book["is_active"], true);
    assert_eq!(book["featured"], false);
}

#[tokio::test]
async fn test_slug_collisions_append_numeric_suffixes() {
    let server = setup_test_server().await;
    let token = admin_token();

    let first = create_book(&server.router, &token, book_payload("Test", "978-1")).await;
    let second = create_book(&server.router, &token, book_payload("Test", "978-2")).await;
    let third = create_book(&server.router, &token, book_payload("Test", "978-3")).await;

    assert_eq!(first["slug"], "test");
    assert_eq!(second["slug"], "test-1");
    assert_eq!(third["slug"], "test-2");
}

#[tokio::test]
async fn test_update_without_title_change_keeps_slug() {
    let server = setup_test_server().await;
    let token = admin_token();

    let book = create_book(&server.router, &token, book_payload("Quijote", "978-10")).await;
    let id = book["id"].as_i64().unwrap();

    // Unrelated edit: title unchanged, pages added
    let mut data = book_payload("Quijote", "978-10");
    data["pages"] = json!(863);

    let (status, updated) = send_multipart(
        &server.router,
        Method::PUT,
        &format!("/api/v1/books/{id}"),
        Some(&token),
        &data,
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "quijote");
    assert_eq!(updated["pages"], 863);
}

#[tokio::test]
async fn test_update_with_title_change_regenerates_slug() {
    let server = setup_test_server().await;
    let token = admin_token();

    create_book(&server.router, &token, book_payload("Rayuela", "978-20")).await;
    let book = create_book(&server.router, &token, book_payload("Ficciones", "978-21")).await;
    let id = book["id"].as_i64().unwrap();

    // Renaming onto an occupied slug picks the next free suffix
    let (status, updated) = send_multipart(
        &server.router,
        Method::PUT,
        &format!("/api/v1/books/{id}"),
        Some(&token),
        &book_payload("Rayuela", "978-21"),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "rayuela-1");
}

#[tokio::test]
async fn test_isbn_must_be_unique() {
    let server = setup_test_server().await;
    let token = admin_token();

    create_book(&server.router, &token, book_payload("Uno", "978-same")).await;

    let (status, body) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/books",
        Some(&token),
        &book_payload("Dos", "978-same"),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["isbn"].is_string(), "missing isbn error: {body}");
}

#[tokio::test]
async fn test_validation_rejects_unknown_enum_values() {
    let server = setup_test_server().await;
    let token = admin_token();

    let mut data = book_payload("Audiolibro", "978-30");
    data["book_type"] = json!("audio");
    data["access_level"] = json!("loan_only");

    let (status, body) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/books",
        Some(&token),
        &data,
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["book_type"].is_string());
    assert!(body["errors"]["access_level"].is_string());
}

#[tokio::test]
async fn test_category_sync_preserves_unchanged_rows() {
    let server = setup_test_server().await;
    let token = admin_token();

    let mut category_ids = Vec::new();
    for name in ["Novela", "Poesía", "Ensayo", "Teatro"] {
        let category = create_category(&server.router, &token, json!({ "name": name })).await;
        category_ids.push(category["id"].as_i64().unwrap() as i32);
    }

    let mut data = book_payload("Antología", "978-40");
    data["categories"] = json!(&category_ids[..3]);
    let book = create_book(&server.router, &token, data).await;
    let book_id = book["id"].as_i64().unwrap() as i32;

    let before = entity::book_category::Entity::find()
        .filter(entity::book_category::Column::BookId.eq(book_id))
        .all(&server.db)
        .await
        .unwrap();
    assert_eq!(before.len(), 3);

    // {1,2,3} -> {2,3,4}
    let mut data = book_payload("Antología", "978-40");
    data["categories"] = json!(&category_ids[1..4]);
    let (status, _) = send_multipart(
        &server.router,
        Method::PUT,
        &format!("/api/v1/books/{book_id}"),
        Some(&token),
        &data,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let after = entity::book_category::Entity::find()
        .filter(entity::book_category::Column::BookId.eq(book_id))
        .all(&server.db)
        .await
        .unwrap();

    let row_id = |rows: &[entity::book_category::Model], category_id: i32| {
        rows.iter()
            .find(|r| r.category_id == category_id)
            .map(|r| r.id)
    };

    // Removed membership is gone, new one added
    assert_eq!(after.len(), 3);
    assert!(row_id(&after, category_ids[0]).is_none());
    assert!(row_id(&after, category_ids[3]).is_some());

    // Unchanged memberships kept their original rows
    assert_eq!(row_id(&after, category_ids[1]), row_id(&before, category_ids[1]));
    assert_eq!(row_id(&after, category_ids[2]), row_id(&before, category_ids[2]));
}

#[tokio::test]
async fn test_contributor_update_replaces_all_rows() {
    let server = setup_test_server().await;
    let token = admin_token();

    let mut data = book_payload("Colaboraciones", "978-50");
    data["contributors"] = json!([
        { "full_name": "Ana", "contributor_type": "author" },
        { "full_name": "Blas", "contributor_type": "editor" },
    ]);
    let book = create_book(&server.router, &token, data).await;
    let book_id = book["id"].as_i64().unwrap();

    let old_ids: Vec<i64> = book["contributors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(old_ids.len(), 2);

    // [Ana, Blas] -> [Blas, Carla]: every row is recreated
    let mut data = book_payload("Colaboraciones", "978-50");
    data["contributors"] = json!([
        { "full_name": "Blas", "contributor_type": "editor" },
        { "full_name": "Carla", "contributor_type": "translator" },
    ]);
    let (status, updated) = send_multipart(
        &server.router,
        Method::PUT,
        &format!("/api/v1/books/{book_id}"),
        Some(&token),
        &data,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let contributors = updated["contributors"].as_array().unwrap();
    assert_eq!(contributors.len(), 2);
    assert_eq!(contributors[0]["full_name"], "Blas");
    assert_eq!(contributors[0]["sequence_number"], 1);
    assert_eq!(contributors[1]["full_name"], "Carla");
    assert_eq!(contributors[1]["sequence_number"], 2);

    for contributor in contributors {
        let id = contributor["id"].as_i64().unwrap();
        assert!(!old_ids.contains(&id), "contributor row {id} survived replacement");
    }
}

#[tokio::test]
async fn test_toggle_status_twice_restores_original_record() {
    let server = setup_test_server().await;
    let token = admin_token();

    let book = create_book(&server.router, &token, book_payload("Estado", "978-60")).await;
    let id = book["id"].as_i64().unwrap();
    let uri = format!("/api/v1/books/{id}");

    let (_, before) = send(&server.router, Method::GET, &uri, Some(&token), None).await;

    let toggle_uri = format!("/api/v1/books/{id}/toggle-status");
    let (status, body) = send(&server.router, Method::POST, &toggle_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (status, body) = send(&server.router, Method::POST, &toggle_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], true);

    let (_, after) = send(&server.router, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_toggle_featured_roundtrip() {
    let server = setup_test_server().await;
    let token = librarian_token();

    let book = create_book(&server.router, &token, book_payload("Destacado", "978-61")).await;
    let toggle_uri = format!("/api/v1/books/{}/toggle-featured", book["id"]);

    let (_, body) = send(&server.router, Method::POST, &toggle_uri, Some(&token), None).await;
    assert_eq!(body["featured"], true);

    let (_, body) = send(&server.router, Method::POST, &toggle_uri, Some(&token), None).await;
    assert_eq!(body["featured"], false);
}

#[tokio::test]
async fn test_member_cannot_mutate_books() {
    let server = setup_test_server().await;
    let admin = admin_token();
    let member = member_token();

    let book = create_book(&server.router, &admin, book_payload("Vedado", "978-70")).await;
    let id = book["id"].as_i64().unwrap();

    let (status, _) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/books",
        Some(&member),
        &book_payload("Intruso", "978-71"),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_multipart(
        &server.router,
        Method::PUT,
        &format!("/api/v1/books/{id}"),
        Some(&member),
        &book_payload("Vedado", "978-70"),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &server.router,
        Method::DELETE,
        &format!("/api/v1/books/{id}"),
        Some(&member),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_admin_can_delete() {
    let server = setup_test_server().await;
    let admin = admin_token();
    let librarian = librarian_token();

    let book = create_book(&server.router, &librarian, book_payload("Borrable", "978-80")).await;
    let uri = format!("/api/v1/books/{}", book["id"]);

    let (status, _) = send(&server.router, Method::DELETE, &uri, Some(&librarian), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&server.router, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    // Soft-deleted: gone from the API, still present in the table
    let (status, _) = send(&server.router, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let row = entity::book::Entity::find().one(&server.db).await.unwrap().unwrap();
    assert!(row.deleted_at.is_some());
}

#[tokio::test]
async fn test_list_filters_and_pagination_markers() {
    let server = setup_test_server().await;
    let token = admin_token();

    create_book(&server.router, &token, book_payload("Historia del Perú", "978-90")).await;
    let mut inactive = book_payload("Geografía", "978-91");
    inactive["is_active"] = json!(false);
    create_book(&server.router, &token, inactive).await;

    let (status, body) = send(
        &server.router,
        Method::GET,
        "/api/v1/books?search=Historia",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["books"]["total"], 1);
    assert_eq!(body["books"]["per_page"], 10);
    assert_eq!(body["books"]["current_page"], 1);
    assert_eq!(body["books"]["last_page"], 1);

    let (_, body) = send(
        &server.router,
        Method::GET,
        "/api/v1/books?status=0",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["books"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["books"]["items"][0]["title"], "Geografía");

    assert_eq!(body["stats"]["total_books"], 2);
    assert_eq!(body["stats"]["active_books"], 1);
}

#[tokio::test]
async fn test_unauthenticated_request_is_rejected() {
    let server = setup_test_server().await;

    let (status, _) = send(&server.router, Method::GET, "/api/v1/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
