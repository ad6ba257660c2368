//! Response envelope builder.
//!
//! Success and error responses share one shape: a JSON body and a status
//! code, always with `Content-Type: application/json`. Payloads are
//! serialized as given.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Status 200 with `payload` as the body.
pub fn json<T: Serialize + ?Sized>(payload: &T) -> Response {
    envelope(StatusCode::OK, payload)
}

/// `status` with `payload` as the body.
pub fn error<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Response {
    envelope(status, payload)
}

fn envelope<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Response {
    match serde_json::to_vec(payload) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            response
        }
        Err(e) => {
            // Only reachable for non-JSON-representable payloads.
            tracing::error!(error = %e, "Failed to serialize response payload");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"code":"internal","message":"response serialization failed"}"#,
            )
                .into_response()
        }
    }
}
