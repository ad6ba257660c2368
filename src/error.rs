//! Gateway-originated errors.
//!
//! Upstream rejections never become an [`ApiError`]; they are relayed
//! verbatim by the forwarder. These variants cover what goes wrong on the
//! gateway's side of the hop.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::http::response;
use crate::upstream::FetchError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The fetch capability failed before a response existed.
    #[error("upstream unreachable: {0}")]
    Transport(#[from] FetchError),

    /// The upstream answered with a body that is not JSON.
    #[error("upstream returned malformed JSON: {0}")]
    MalformedUpstream(#[from] serde_json::Error),

    /// The inbound body could not be read (too large, aborted).
    #[error("invalid request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Transport(_) | ApiError::MalformedUpstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable code, same field the upstream API uses.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "upstream_unreachable",
            ApiError::MalformedUpstream(_) => "upstream_malformed",
            ApiError::Body(_) => "invalid_body",
            ApiError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.code(), error = %self, "Gateway error");
        let body = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        response::error(self.status(), &body)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
