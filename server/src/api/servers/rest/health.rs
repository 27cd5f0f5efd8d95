use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

pub async fn check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
