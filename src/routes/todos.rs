//! Todo routes.

use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Map, Value};

use super::forwarder::{forward, ForwardRoute};
use crate::config::GatewayConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::request::{normalize_page, JsonBody, ListQuery};
use crate::http::server::AppState;
use crate::upstream::Verb;

/// Upstream list call for `page`, shared with the todos page loader.
pub fn list_route(config: &GatewayConfig, page: Option<&str>) -> ForwardRoute {
    ForwardRoute::new("todos.list", Verb::Get, ["todos"])
        .authenticated()
        .query("per_page", config.upstream.per_page)
        .query("page", normalize_page(page))
}

fn id_segment(id: &Value) -> ApiResult<String> {
    match id {
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ApiError::BadRequest(
            "todo id must be a string or a number".to_string(),
        )),
    }
}

/// `GET /api/todos[?page=N]` → `GET /todos?per_page=P&page=N`.
pub async fn list(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> ApiResult<(CookieJar, Response)> {
    let route = list_route(&state.config(), query.page.as_deref());
    forward(&state, jar, route, None).await
}

/// `POST /api/todos` → `POST /todos`.
pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(todo): JsonBody<Value>,
) -> ApiResult<(CookieJar, Response)> {
    let route = ForwardRoute::new("todos.create", Verb::Post, ["todos"]).authenticated();
    forward(&state, jar, route, Some(todo)).await
}

/// `PATCH /api/todos` with `{ id, completed }` → `PATCH /todos/{id}` with
/// `{ completed }`.
pub async fn toggle(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(todo): JsonBody<Value>,
) -> ApiResult<(CookieJar, Response)> {
    let (id, patch) = toggle_parts(&todo)?;
    let route = ForwardRoute::new("todos.toggle", Verb::Patch, ["todos".to_string(), id]).authenticated();
    forward(&state, jar, route, Some(patch)).await
}

/// Split a toggle body into the path id and the forwarded patch. An explicit
/// `completed: null` is kept; only a missing field is left out.
fn toggle_parts(todo: &Value) -> ApiResult<(String, Value)> {
    let id = id_segment(todo.get("id").unwrap_or(&Value::Null))?;

    let mut patch = Map::new();
    if let Some(completed) = todo.get("completed") {
        patch.insert("completed".to_string(), completed.clone());
    }
    Ok((id, Value::Object(patch)))
}

/// `DELETE /api/todos/{id}` → `DELETE /todos/{id}`.
pub async fn remove(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> ApiResult<(CookieJar, Response)> {
    let route = ForwardRoute::new("todos.delete", Verb::Delete, ["todos".to_string(), id]).authenticated();
    forward(&state, jar, route, None).await
}
