//! Inbound routes.
//!
//! ```text
//! /api/*      forwarders (forwarder.rs), relay upstream status + payload
//! /pages/*    page data loaders, never fail
//! /health     liveness
//! ```

pub mod auth;
pub mod forwarder;
pub mod pages;
pub mod todos;

use axum::{
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use crate::http::server::AppState;

pub use forwarder::{dispatch, forward, ForwardRoute, Relay, SessionEffect};

/// Route table. State is attached by the server.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/login", post(auth::login))
        .route("/api/logout", delete(auth::logout))
        .route("/api/me", get(auth::me))
        .route("/api/register", post(auth::register))
        .route(
            "/api/todos",
            get(todos::list).post(todos::create).patch(todos::toggle),
        )
        .route("/api/todos/{id}", delete(todos::remove))
        .route("/pages/todos", get(pages::todos_page))
        .route("/pages/layout", get(pages::layout))
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "todo-gateway"
    }))
}
