//! Request forwarder.
//!
//! Every API route is an instance of one algorithm:
//!
//! ```text
//! Start     read session token from the cookie jar (authenticated routes)
//! Dispatch  build upstream URL, call the verb client
//! Decode    parse the upstream body as JSON
//! Branch    not ok → error envelope with upstream status + payload
//!           ok     → success envelope (status 200) + session cookie effect
//! ```
//!
//! Routes differ only in the [`ForwardRoute`] they pass in.

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::error::ApiResult;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::session::SessionCookies;
use crate::upstream::{client, endpoint, resolve_backend_base, RequestOptions, Verb};

/// What a successful upstream call does to the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    Keep,
    Establish,
    Clear,
}

/// Parameters of one forwarding route.
#[derive(Debug, Clone)]
pub struct ForwardRoute {
    /// Label for logs and metrics.
    pub name: &'static str,
    pub verb: Verb,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    /// Relay the session token as a bearer credential.
    pub authenticated: bool,
    pub session: SessionEffect,
}

impl ForwardRoute {
    pub fn new<S: Into<String>>(
        name: &'static str,
        verb: Verb,
        segments: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name,
            verb,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            authenticated: false,
            session: SessionEffect::Keep,
        }
    }

    pub fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn session(mut self, effect: SessionEffect) -> Self {
        self.session = effect;
        self
    }
}

/// Decoded upstream answer.
#[derive(Debug, Clone)]
pub struct Relay {
    pub status: StatusCode,
    pub ok: bool,
    pub payload: Value,
}

/// Start, Dispatch and Decode. Transport failures and non-JSON bodies come
/// back as errors; upstream rejections come back as a `Relay` with
/// `ok == false`.
pub async fn dispatch(
    state: &AppState,
    jar: &CookieJar,
    route: &ForwardRoute,
    body: Option<Value>,
) -> ApiResult<Relay> {
    let config = state.config();
    let cookies = SessionCookies::from_config(&config.session);

    let token = if route.authenticated {
        cookies.token(jar)
    } else {
        None
    };

    let url = endpoint(
        resolve_backend_base(&config.upstream),
        route.segments.as_slice(),
        &route.query,
    )?;

    let mut opts = RequestOptions::new().token(token);
    opts.body = body;

    tracing::debug!(
        route = route.name,
        method = %route.verb.method(),
        url = %url,
        "Forwarding to upstream"
    );

    let started = Instant::now();
    let response = match client::call(state.fetch(), route.verb, &url, opts).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(route = route.name, url = %url, error = %e, "Upstream request failed");
            metrics::record_upstream_failure(route.name);
            return Err(e.into());
        }
    };
    metrics::record_upstream_latency(route.name, started);
    tracing::debug!(route = route.name, status = %response.status(), "Upstream answered");

    let payload: Value = response.json().map_err(|e| {
        tracing::error!(
            route = route.name,
            status = %response.status(),
            error = %e,
            "Upstream returned malformed JSON"
        );
        metrics::record_upstream_failure(route.name);
        e
    })?;

    Ok(Relay {
        status: response.status(),
        ok: response.ok(),
        payload,
    })
}

/// Run the full forwarding algorithm and build the browser response.
pub async fn forward(
    state: &AppState,
    jar: CookieJar,
    route: ForwardRoute,
    body: Option<Value>,
) -> ApiResult<(CookieJar, Response)> {
    let relay = match dispatch(state, &jar, &route, body).await {
        Ok(relay) => relay,
        Err(e) => {
            metrics::record_request(route.name, e.status().as_u16());
            return Err(e);
        }
    };

    if !relay.ok {
        tracing::info!(
            route = route.name,
            status = %relay.status,
            "Upstream rejected request"
        );
        metrics::record_request(route.name, relay.status.as_u16());
        return Ok((jar, response::error(relay.status, &relay.payload)));
    }

    let cookies = SessionCookies::from_config(&state.config().session);
    let jar = match route.session {
        SessionEffect::Keep => jar,
        SessionEffect::Establish => match relay.payload.get("token").and_then(Value::as_str) {
            Some(token) => {
                tracing::info!(route = route.name, "Session established");
                cookies.establish(jar, token)
            }
            None => {
                tracing::warn!(
                    route = route.name,
                    "Upstream session payload has no token, cookie left untouched"
                );
                jar
            }
        },
        SessionEffect::Clear => {
            tracing::info!(route = route.name, "Session cleared");
            cookies.clear(jar)
        }
    };

    metrics::record_request(route.name, StatusCode::OK.as_u16());
    Ok((jar, response::json(&relay.payload)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::error::ApiError;
    use crate::upstream::{Fetch, FetchError, UpstreamRequest, UpstreamResponse};
    use async_trait::async_trait;
    use axum::http::{header, HeaderMap, HeaderValue};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Replays one canned answer and records what it was asked.
    struct Canned {
        status: StatusCode,
        body: &'static str,
        seen: Mutex<Vec<UpstreamRequest>>,
    }

    impl Canned {
        fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> UpstreamRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Fetch for Canned {
        async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FetchError> {
            self.seen.lock().unwrap().push(request);
            Ok(UpstreamResponse::new(self.status, self.body))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Fetch for Unreachable {
        async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, FetchError> {
            Err(FetchError::InvalidUrl(request.url))
        }
    }

    fn state(fetch: Arc<dyn Fetch>) -> AppState {
        let mut config = GatewayConfig::default();
        config.upstream.api_prefix = Some("http://upstream:3000".into());
        AppState::new(config, fetch)
    }

    fn signed_in() -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session=abc"));
        CookieJar::from_headers(&headers)
    }

    async fn body_of(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_forces_status_200() {
        let fetch = Canned::new(StatusCode::CREATED, r#"{"id":7,"title":"milk"}"#);
        let route = ForwardRoute::new("todos.create", Verb::Post, ["todos"]).authenticated();

        let (_, res) = forward(&state(fetch.clone()), signed_in(), route, Some(json!({"title": "milk"})))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_of(res).await, json!({"id": 7, "title": "milk"}));

        let sent = fetch.last();
        assert_eq!(sent.url, "http://upstream:3000/todos");
        assert_eq!(sent.headers.get(header::AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[tokio::test]
    async fn test_rejection_is_relayed_verbatim() {
        let fetch = Canned::new(
            StatusCode::FORBIDDEN,
            r#"{"code":"unauthorized","message":"unauthorized"}"#,
        );
        let route = ForwardRoute::new("me", Verb::Get, ["users", "current"]).authenticated();

        let (_, res) = forward(&state(fetch), CookieJar::new(), route, None).await.unwrap();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_of(res).await,
            json!({"code": "unauthorized", "message": "unauthorized"})
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_route_never_sends_token() {
        let fetch = Canned::new(StatusCode::OK, r#"{"id":1}"#);
        let route = ForwardRoute::new("register", Verb::Post, ["users"]);

        forward(&state(fetch.clone()), signed_in(), route, Some(json!({"username": "a"})))
            .await
            .unwrap();

        assert!(fetch.last().headers.get(header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_establish_sets_cookie_from_payload_token() {
        let fetch = Canned::new(StatusCode::OK, r#"{"id":1,"token":"abc"}"#);
        let route = ForwardRoute::new("login", Verb::Post, ["sessions"])
            .session(SessionEffect::Establish);

        let (jar, _) = forward(&state(fetch), CookieJar::new(), route, Some(json!({})))
            .await
            .unwrap();

        let cookie = jar.get("session").unwrap();
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
    }

    #[tokio::test]
    async fn test_establish_without_token_leaves_jar() {
        let fetch = Canned::new(StatusCode::OK, r#"{"id":1}"#);
        let route = ForwardRoute::new("login", Verb::Post, ["sessions"])
            .session(SessionEffect::Establish);

        let (jar, res) = forward(&state(fetch), CookieJar::new(), route, None).await.unwrap();
        assert!(jar.get("session").is_none());
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejected_login_does_not_touch_cookie() {
        let fetch = Canned::new(
            StatusCode::BAD_REQUEST,
            r#"{"code":"unknown","message":"invalid password"}"#,
        );
        let route = ForwardRoute::new("login", Verb::Post, ["sessions"])
            .session(SessionEffect::Establish);

        let (jar, res) = forward(&state(fetch), CookieJar::new(), route, None).await.unwrap();
        assert!(jar.get("session").is_none());
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_clear_ignores_payload() {
        let fetch = Canned::new(StatusCode::OK, r#"{"anything":"goes"}"#);
        let route = ForwardRoute::new("logout", Verb::Delete, ["sessions", "current"])
            .authenticated()
            .session(SessionEffect::Clear);

        let (jar, _) = forward(&state(fetch), signed_in(), route, None).await.unwrap();

        let cookie = jar.get("session").unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(
            cookie.expires_datetime(),
            Some(time::OffsetDateTime::UNIX_EPOCH)
        );
    }

    #[tokio::test]
    async fn test_rejected_logout_keeps_cookie() {
        let fetch = Canned::new(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"boom"}"#);
        let route = ForwardRoute::new("logout", Verb::Delete, ["sessions", "current"])
            .authenticated()
            .session(SessionEffect::Clear);

        let (jar, res) = forward(&state(fetch), signed_in(), route, None).await.unwrap();
        assert_eq!(jar.get("session").unwrap().value(), "abc");
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_query_is_appended() {
        let fetch = Canned::new(StatusCode::OK, "[]");
        let route = ForwardRoute::new("todos.list", Verb::Get, ["todos"])
            .authenticated()
            .query("per_page", 5)
            .query("page", 2);

        forward(&state(fetch.clone()), signed_in(), route, None).await.unwrap();
        assert_eq!(fetch.last().url, "http://upstream:3000/todos?per_page=5&page=2");
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_error() {
        let route = ForwardRoute::new("me", Verb::Get, ["users", "current"]);
        let err = forward(&state(Arc::new(Unreachable)), CookieJar::new(), route, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[test]
    fn test_gateway_errors_are_counted() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        ::metrics::with_local_recorder(&recorder, || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let route = ForwardRoute::new("me", Verb::Get, ["users", "current"]);
                forward(&state(Arc::new(Unreachable)), CookieJar::new(), route, None)
                    .await
                    .unwrap_err();

                let fetch = Canned::new(StatusCode::OK, "<html>oops</html>");
                let route = ForwardRoute::new("register", Verb::Post, ["users"]);
                forward(&state(fetch), CookieJar::new(), route, None)
                    .await
                    .unwrap_err();
            });
        });

        let rendered = handle.render();
        let counted = |route: &str| {
            rendered.lines().any(|line| {
                line.starts_with("gateway_requests_total{")
                    && line.contains(&format!("route=\"{}\"", route))
                    && line.contains("status=\"502\"")
                    && line.ends_with(" 1")
            })
        };
        assert!(counted("me"), "{}", rendered);
        assert!(counted("register"), "{}", rendered);
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let fetch = Canned::new(StatusCode::OK, "<html>oops</html>");
        let route = ForwardRoute::new("me", Verb::Get, ["users", "current"]);
        let err = forward(&state(fetch), CookieJar::new(), route, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedUpstream(_)));
    }
}
