//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml (optional)
//!     → loader.rs (parse, fold in API_PREFIX)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → stored in an ArcSwap read by every request
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the ArcSwap contents
//! ```

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load, ConfigError};
pub use schema::{
    GatewayConfig, ListenerConfig, ObservabilityConfig, SecurityConfig, SessionConfig,
    TimeoutConfig, UpstreamConfig,
};
