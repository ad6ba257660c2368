//! Todo gateway library.
//!
//! A backend-for-frontend that relays browser calls to the todo REST API,
//! translating the `session` cookie into a bearer token on the way out and
//! maintaining that cookie on login and logout.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;
pub mod session;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
