//! Integration tests for file-upload handling in the book/category flows.
//!
//! Files must only hit the disk after validation passes, and a replaced
//! upload removes its predecessor from storage.

mod common;

use std::path::Path;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;

fn stored_files(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path.to_string_lossy().into_owned());
            }
        }
    }
    files
}

#[tokio::test]
async fn test_cover_and_pdf_are_stored_under_their_directories() {
    let server = setup_test_server().await;
    let token = admin_token();

    let (status, book) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/books",
        Some(&token),
        &book_payload("Ilustrado", "978-400"),
        &[
            ("cover_image", "portada.jpg", "image/jpeg", b"jpeg-bytes"),
            ("pdf_file", "libro.pdf", "application/pdf", b"pdf-bytes"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "create failed: {book}");

    let cover = book["cover_image"].as_str().unwrap();
    let pdf = book["pdf_file"].as_str().unwrap();
    assert!(cover.starts_with("covers/"));
    assert!(pdf.starts_with("books/"));

    assert!(server.storage_dir.path().join(cover).exists());
    assert!(server.storage_dir.path().join(pdf).exists());
}

#[tokio::test]
async fn test_invalid_upload_rejected_before_any_write() {
    let server = setup_test_server().await;
    let token = admin_token();

    // PDF bytes smuggled in as a cover image
    let (status, body) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/books",
        Some(&token),
        &book_payload("Tramposo", "978-401"),
        &[("cover_image", "cover.pdf", "application/pdf", b"not-an-image")],
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["cover_image"].is_string());

    // Nothing reached the disk and nothing reached the database
    assert!(stored_files(server.storage_dir.path()).is_empty());
    let (_, list) = send(&server.router, Method::GET, "/api/v1/books", Some(&token), None).await;
    assert_eq!(list["books"]["total"], 0);
}

#[tokio::test]
async fn test_replacing_cover_removes_previous_file() {
    let server = setup_test_server().await;
    let token = admin_token();

    let (_, book) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/books",
        Some(&token),
        &book_payload("Portadas", "978-402"),
        &[("cover_image", "v1.png", "image/png", b"first-cover")],
    )
    .await;
    let id = book["id"].as_i64().unwrap();
    let old_cover = book["cover_image"].as_str().unwrap().to_string();

    let (status, updated) = send_multipart(
        &server.router,
        Method::PUT,
        &format!("/api/v1/books/{id}"),
        Some(&token),
        &book_payload("Portadas", "978-402"),
        &[("cover_image", "v2.png", "image/png", b"second-cover")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let new_cover = updated["cover_image"].as_str().unwrap();
    assert_ne!(new_cover, old_cover);
    assert!(!server.storage_dir.path().join(&old_cover).exists());
    assert!(server.storage_dir.path().join(new_cover).exists());
}

#[tokio::test]
async fn test_update_without_upload_keeps_stored_file() {
    let server = setup_test_server().await;
    let token = admin_token();

    let (_, book) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/books",
        Some(&token),
        &book_payload("Persistente", "978-403"),
        &[("cover_image", "cover.png", "image/png", b"cover")],
    )
    .await;
    let id = book["id"].as_i64().unwrap();
    let cover = book["cover_image"].as_str().unwrap().to_string();

    let (status, updated) = send_multipart(
        &server.router,
        Method::PUT,
        &format!("/api/v1/books/{id}"),
        Some(&token),
        &book_payload("Persistente", "978-403"),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["cover_image"], cover.as_str());
    assert!(server.storage_dir.path().join(&cover).exists());
}

#[tokio::test]
async fn test_category_image_upload() {
    let server = setup_test_server().await;
    let token = admin_token();

    let (status, category) = send_multipart(
        &server.router,
        Method::POST,
        "/api/v1/categories",
        Some(&token),
        &json!({ "name": "Con Imagen" }),
        &[("image", "icono.png", "image/png", b"icon-bytes")],
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let image = category["image"].as_str().unwrap();
    assert!(image.starts_with("categories/"));
    assert!(server.storage_dir.path().join(image).exists());
}
