//! Todo gateway.
//!
//! ```text
//!                ┌───────────────────────────────────────────────┐
//!   Browser      │                  GATEWAY                      │
//!   ─────────────┼─▶ http/server ─▶ routes/forwarder ─┐          │
//!   cookie:      │                                    ▼          │
//!   session      │     session (cookie ⇄ token)   upstream/client ┼──▶ Todo API
//!                │                                    │          │   (Bearer)
//!   ◀────────────┼── http/response ◀──────────────────┘          │
//!   Set-Cookie   │                                               │
//!                └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use todo_gateway::config::{self, watcher::ConfigWatcher};
use todo_gateway::observability::{logging, metrics};
use todo_gateway::upstream::resolve_backend_base;
use todo_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "todo-gateway")]
#[command(about = "Backend-for-frontend for the todo API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability.log_level);
    tracing::info!("todo-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %resolve_backend_base(&config.upstream),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match cli.config.as_deref() {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    shutdown.on_ctrl_c();
    let server = HttpServer::new(config)?;
    server
        .run(listener, config_updates, shutdown.subscribe())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
