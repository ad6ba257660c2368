//! HTTP verb client.
//!
//! Four thin wrappers that apply the outbound header policy and hand the
//! request to the injected [`Fetch`]:
//! - `Authorization: Bearer <token>` iff the token is non-empty and
//!   encodable as a header value
//! - `Content-Type: application/json` plus a serialized body iff the verb
//!   carries a body (POST, PATCH) and the body is truthy
//!
//! "Truthy" follows the browser semantics the gateway replaces: `null`,
//! `false`, `0` and `""` count as no body. Objects and arrays, even empty
//! ones, are always sent.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method};
use serde_json::Value;

use super::fetch::{Fetch, FetchError, UpstreamRequest, UpstreamResponse};

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub token: Option<String>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl Verb {
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Patch => Method::PATCH,
            Verb::Delete => Method::DELETE,
        }
    }

    fn carries_body(self) -> bool {
        matches!(self, Verb::Post | Verb::Patch)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Build the outbound request descriptor for `verb`.
pub fn describe(verb: Verb, url: &str, opts: RequestOptions) -> Result<UpstreamRequest, FetchError> {
    let mut headers = HeaderMap::new();

    if let Some(token) = opts.token.as_deref().filter(|t| !t.is_empty()) {
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(value) => {
                headers.insert(header::AUTHORIZATION, value);
            }
            Err(_) => {
                tracing::warn!("Session token is not a valid header value, sending without credentials");
            }
        }
    }

    let mut body = None;
    if verb.carries_body() {
        if let Some(payload) = opts.body.as_ref().filter(|b| is_truthy(b)) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            let encoded = serde_json::to_vec(payload).map_err(FetchError::Encode)?;
            body = Some(Bytes::from(encoded));
        }
    }

    Ok(UpstreamRequest {
        method: verb.method(),
        url: url.to_string(),
        headers,
        body,
    })
}

/// Dispatch `verb` through the fetch capability.
pub async fn call(
    fetch: &dyn Fetch,
    verb: Verb,
    url: &str,
    opts: RequestOptions,
) -> Result<UpstreamResponse, FetchError> {
    let request = describe(verb, url, opts)?;
    fetch.fetch(request).await
}

pub async fn get(fetch: &dyn Fetch, url: &str, opts: RequestOptions) -> Result<UpstreamResponse, FetchError> {
    call(fetch, Verb::Get, url, opts).await
}

pub async fn post(fetch: &dyn Fetch, url: &str, opts: RequestOptions) -> Result<UpstreamResponse, FetchError> {
    call(fetch, Verb::Post, url, opts).await
}

pub async fn patch(fetch: &dyn Fetch, url: &str, opts: RequestOptions) -> Result<UpstreamResponse, FetchError> {
    call(fetch, Verb::Patch, url, opts).await
}

pub async fn delete(fetch: &dyn Fetch, url: &str, opts: RequestOptions) -> Result<UpstreamResponse, FetchError> {
    call(fetch, Verb::Delete, url, opts).await
}
