//! Upstream REST API access.
//!
//! # Data Flow
//! ```text
//! route handler
//!     → address.rs (resolve backend base, build endpoint URL)
//!     → client.rs (verb wrapper: bearer token + JSON body policy)
//!     → fetch.rs (injected Fetch capability performs the call)
//!     → UpstreamResponse (status + raw body, decoded by the caller)
//! ```
//!
//! The fetch capability is a trait object so handlers can be driven by a
//! stub returning canned responses.

pub mod address;
pub mod client;
pub mod fetch;

pub use address::{endpoint, resolve_backend_base, DEFAULT_BACKEND_BASE};
pub use client::{RequestOptions, Verb};
pub use fetch::{Fetch, FetchError, ReqwestFetch, UpstreamRequest, UpstreamResponse};
