//! Shutdown coordination for the router.

use std::future::Future;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator for graceful shutdown.
///
/// Every long-running task (HTTP server, future queue consumers) holds a
/// receiver; a single `trigger` stops them all.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify all subscribers. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        let listeners = self.tx.send(()).unwrap_or(0);
        tracing::info!(listeners, "Shutdown triggered");
        listeners
    }

    /// Number of tasks still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Run until `signal` fires or `server` ends on its own, whichever is first.
///
/// On a signal, `shutdown` is triggered and the server is drained. A server
/// that stops early returns its own result without waiting for a signal.
pub async fn serve_until<E>(
    mut server: JoinHandle<Result<(), E>>,
    signal: impl Future<Output = ()>,
    shutdown: &Shutdown,
) -> Result<(), E> {
    let joined = tokio::select! {
        _ = signal => {
            shutdown.trigger();
            server.await
        }
        joined = &mut server => {
            tracing::error!("HTTP server exited before a shutdown signal");
            joined
        }
    };

    match joined {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "HTTP server task failed");
            Ok(())
        }
    }
}
