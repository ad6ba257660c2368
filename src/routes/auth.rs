//! Session and account routes.

use axum::{extract::State, response::Response};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use super::forwarder::{forward, ForwardRoute, SessionEffect};
use crate::error::ApiResult;
use crate::http::request::JsonBody;
use crate::http::server::AppState;
use crate::upstream::Verb;

/// `POST /api/login` → `POST /sessions`, sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(credentials): JsonBody<Value>,
) -> ApiResult<(CookieJar, Response)> {
    let route = ForwardRoute::new("login", Verb::Post, ["sessions"])
        .session(SessionEffect::Establish);
    forward(&state, jar, route, Some(credentials)).await
}

/// `DELETE /api/logout` → `DELETE /sessions/current`, clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Response)> {
    let route = ForwardRoute::new("logout", Verb::Delete, ["sessions", "current"])
        .authenticated()
        .session(SessionEffect::Clear);
    forward(&state, jar, route, None).await
}

/// `GET /api/me` → `GET /users/current`.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> ApiResult<(CookieJar, Response)> {
    let route = ForwardRoute::new("me", Verb::Get, ["users", "current"]).authenticated();
    forward(&state, jar, route, None).await
}

/// `POST /api/register` → `POST /users`. No token is relayed.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(user): JsonBody<Value>,
) -> ApiResult<(CookieJar, Response)> {
    let route = ForwardRoute::new("register", Verb::Post, ["users"]);
    forward(&state, jar, route, Some(user)).await
}
