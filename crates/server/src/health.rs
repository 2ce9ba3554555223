//! Liveness endpoint. Answers without touching any tool handler.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

pub(crate) fn router(path: &str) -> Router {
    Router::new().route(path, get(health))
}

async fn health() -> Json<Value> {
    Json(json!({"ok": true}))
}
