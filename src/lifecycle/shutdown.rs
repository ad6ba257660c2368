//! Shutdown coordination.

use tokio::sync::broadcast;

/// Cloneable shutdown handle.
///
/// The server waits on a receiver; `main` wires Ctrl-C to it and tests call
/// [`Shutdown::trigger`] to stop a gateway they spawned. A receiver also
/// resolves once every handle has been dropped.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Fire the trigger on the first Ctrl-C.
    pub fn on_ctrl_c(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Ctrl-C received");
                    shutdown.trigger();
                }
                Err(e) => tracing::warn!(error = %e, "Failed to install Ctrl-C handler"),
            }
        });
    }

    /// Number of tasks still listening.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
