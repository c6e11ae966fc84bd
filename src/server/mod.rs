//! HTTP Server
//!
//! Axum router wiring for the gateway: the streaming chat endpoint, the
//! liveness probe, and the permissive CORS layer the original deployment
//! expects.

pub mod chat;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;

/// Shared, read-only per-process state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Build the gateway router.
pub fn build_router(config: AppConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe. No side effects.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
