//! Stopping the siteverify daemon.
//!
//! `main` spawns [`ShutdownController::wait_for_signal`] next to the form
//! server; on SIGINT or SIGTERM the server stops accepting connections,
//! lets in-flight verifications finish, and the process exits.

use tokio::signal;
use tokio::sync::broadcast;

/// Tells the form server to stop. Each [`crate::server::serve`] call holds
/// one subscription.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver that resolves once the daemon is asked to stop. Only
    /// shutdowns sent after subscribing are seen.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Stop the form server without a signal.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Block until the process receives SIGINT or SIGTERM, then stop the
    /// form server. Off Unix only Ctrl-C is watched.
    pub async fn wait_for_signal(&self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!("cannot install SIGTERM handler: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => { tracing::info!("received SIGINT, shutting down"); }
            _ = terminate => { tracing::info!("received SIGTERM, shutting down"); }
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}
