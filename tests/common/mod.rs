//! Shared utilities for integration testing: a scripted todo API standing in
//! for the upstream, and a gateway bound to an ephemeral port in front of it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use todo_gateway::config::GatewayConfig;
use todo_gateway::http::HttpServer;
use todo_gateway::lifecycle::Shutdown;

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "secret";

/// One request as the upstream saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct MockUpstream {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockUpstream {
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Seen {
        self.seen().pop().expect("upstream saw no request")
    }
}

/// Start the scripted todo API. Returns its base URL.
pub async fn start_mock_upstream() -> (String, MockUpstream) {
    let upstream = MockUpstream::default();
    let app = Router::new().fallback(handle).with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), upstream)
}

/// A base URL nothing listens on.
pub async fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Start a gateway forwarding to `api_prefix`. Returns its base URL and the
/// shutdown handle.
pub async fn start_gateway(api_prefix: &str) -> (String, Shutdown) {
    let mut config = GatewayConfig::default();
    config.upstream.api_prefix = Some(api_prefix.to_string());
    start_gateway_with(config).await
}

pub async fn start_gateway_with(config: GatewayConfig) -> (String, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    (format!("http://{}", addr), shutdown)
}

/// Plain client: no cookie store, no redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn reject(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

async fn handle(
    State(upstream): State<MockUpstream>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let body: Option<Value> = serde_json::from_slice(&body).ok();
    let authorization = header_value(header::AUTHORIZATION);

    upstream.seen.lock().unwrap().push(Seen {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: authorization.clone(),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.clone(),
    });

    let bearer = format!("Bearer {}", TOKEN);
    let signed_in = authorization.as_deref() == Some(bearer.as_str());
    let segments: Vec<&str> = uri.path().trim_start_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (Method::POST, ["sessions"]) => {
            let password = body.as_ref().and_then(|b| b.get("password"));
            if password == Some(&json!(PASSWORD)) {
                Json(json!({ "token": TOKEN, "user": { "id": 1, "username": "ada" } }))
                    .into_response()
            } else {
                reject(
                    StatusCode::BAD_REQUEST,
                    "invalid_credentials",
                    "username or password is incorrect",
                )
            }
        }
        (Method::DELETE, ["sessions", "current"]) if signed_in => Json(json!({})).into_response(),
        (Method::GET, ["users", "current"]) if signed_in => {
            Json(json!({ "id": 1, "username": "ada" })).into_response()
        }
        (Method::POST, ["users"]) => {
            let username = body
                .as_ref()
                .and_then(|b| b.get("username"))
                .cloned()
                .unwrap_or(Value::Null);
            Json(json!({ "id": 2, "username": username })).into_response()
        }
        (Method::GET, ["todos"]) if signed_in => Json(json!([
            { "id": 1, "title": "write tests", "completed": false },
            { "id": 2, "title": "ship it", "completed": true }
        ]))
        .into_response(),
        (Method::POST, ["todos"]) if signed_in => {
            let mut todo = body.unwrap_or_else(|| json!({}));
            todo["id"] = json!(3);
            todo["completed"] = json!(false);
            Json(todo).into_response()
        }
        (Method::PATCH, ["todos", id]) if signed_in => {
            let completed = body
                .as_ref()
                .and_then(|b| b.get("completed"))
                .cloned()
                .unwrap_or(Value::Null);
            Json(json!({ "id": id, "completed": completed })).into_response()
        }
        (Method::DELETE, ["todos", _]) if signed_in => Json(json!({})).into_response(),
        (_, ["sessions", "current"] | ["users", "current"] | ["todos", ..]) => {
            reject(StatusCode::FORBIDDEN, "forbidden", "missing or invalid token")
        }
        _ => reject(StatusCode::NOT_FOUND, "not_found", "no such route"),
    }
}
