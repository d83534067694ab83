//! HTTP routes for the query server

pub mod query;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::server::state::AppState;

/// Build all routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(info))
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .route("/query", post(query::query_rag))
}

/// GET / - Service description
async fn info() -> Json<Value> {
    Json(json!({
        "message": "RAG Query API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/query": "POST - Send a query to get formatted response",
            "/health": "GET - Health check",
            "/ready": "GET - Vector store readiness"
        }
    }))
}

/// GET /health - Liveness, no dependency checks
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "RAG API is running"
    }))
}

/// GET /ready - Both collections reachable
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    if state.is_ready().await {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
