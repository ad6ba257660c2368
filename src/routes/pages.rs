//! Page data loaders.
//!
//! Unlike the API routes these never propagate an error: the todo page
//! degrades to an empty list when the upstream read fails.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::forwarder::dispatch;
use super::todos::list_route;
use crate::http::request::ListQuery;
use crate::http::server::AppState;
use crate::session::SessionCookies;

#[derive(Debug, Serialize, PartialEq)]
pub struct TodosPage {
    pub todos: Value,
}

impl TodosPage {
    pub fn empty() -> Self {
        Self {
            todos: Value::Array(Vec::new()),
        }
    }
}

/// Fetch the todo list for page rendering.
pub async fn load_todos(state: &AppState, jar: &CookieJar, page: Option<&str>) -> TodosPage {
    let route = list_route(&state.config(), page);

    match dispatch(state, jar, &route, None).await {
        Ok(relay) if relay.ok => TodosPage {
            todos: relay.payload,
        },
        Ok(relay) => {
            let message = relay
                .payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("");
            tracing::error!(status = %relay.status, upstream_message = message, "Failed to load todos");
            TodosPage::empty()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load todos");
            TodosPage::empty()
        }
    }
}

/// `GET /pages/todos`
pub async fn todos_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Json<TodosPage> {
    Json(load_todos(&state, &jar, query.page.as_deref()).await)
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    pub success: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LayoutData {
    pub session: Option<String>,
    pub success: Option<String>,
}

/// `GET /pages/layout`: current session token and the `success` flash.
pub async fn layout(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LayoutQuery>,
) -> Json<LayoutData> {
    let cookies = SessionCookies::from_config(&state.config().session);
    Json(LayoutData {
        session: cookies.token(&jar),
        success: query.success.filter(|s| !s.is_empty()),
    })
}
