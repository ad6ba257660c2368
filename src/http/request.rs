//! Inbound request helpers.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID assigned by the request-id layer, for log fields.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// JSON request body, parsed whatever the `Content-Type` says.
///
/// Rejections are [`ApiError`]s, so a bad body still gets a JSON envelope.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("request body is not valid JSON: {}", e)))?;
        Ok(Self(value))
    }
}

/// Query string of the todo list routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
}

/// Normalize a raw `page` value. Missing, non-numeric and non-positive
/// values all mean the first page.
pub fn normalize_page(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.parse::<i64>().ok())
        .filter(|page| *page > 0)
        .map(|page| page as u64)
        .unwrap_or(1)
}
