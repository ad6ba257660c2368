//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit)
//! - Hold the live configuration and the fetch capability
//! - Apply hot-reloaded configuration
//! - Serve until the shutdown trigger fires

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::{DefaultBodyLimit, Request},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::request_id;
use crate::routes;
use crate::upstream::{Fetch, FetchError, ReqwestFetch};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ArcSwap<GatewayConfig>>,
    fetch: Arc<dyn Fetch>,
}

impl AppState {
    pub fn new(config: GatewayConfig, fetch: Arc<dyn Fetch>) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            fetch,
        }
    }

    /// Snapshot of the live configuration.
    pub fn config(&self) -> Arc<GatewayConfig> {
        self.config.load_full()
    }

    pub fn fetch(&self) -> &dyn Fetch {
        self.fetch.as_ref()
    }

    /// Replace the live configuration; in-flight requests keep their snapshot.
    pub fn swap_config(&self, config: GatewayConfig) {
        self.config.store(Arc::new(config));
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server that reaches the upstream through reqwest.
    pub fn new(config: GatewayConfig) -> Result<Self, FetchError> {
        let fetch = ReqwestFetch::new(&config.upstream)?;
        Ok(Self::with_fetch(config, Arc::new(fetch)))
    }

    /// Create a server with a caller-supplied fetch capability.
    pub fn with_fetch(config: GatewayConfig, fetch: Arc<dyn Fetch>) -> Self {
        let state = AppState::new(config, fetch);
        let router = Self::build_router(&state.config(), state.clone());
        Self { router, state }
    }

    /// The router with state and middleware attached.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        routes::router()
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id(request.headers()),
                        )
                    }))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server on `listener`.
    ///
    /// Configurations arriving on `config_updates` replace the live one.
    /// Listener, timeout and body limit settings are fixed at construction.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                tracing::info!(
                    api_prefix = ?config.upstream.api_prefix,
                    "Applying reloaded configuration"
                );
                state.swap_config(config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
