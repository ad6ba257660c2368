//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! browser request
//!     → server.rs (Axum setup, middleware, AppState)
//!     → request.rs (request ID, query normalization)
//!     → routes (forwarder / page loaders)
//!     → response.rs (JSON envelope)
//!     → browser response (+ Set-Cookie)
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
