//! HTTP server for the dashboard API
//!
//! Binds the listener, serves the router on a background task and shuts
//! down gracefully when asked.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::{Error, Result};
use crate::routes::router;
use crate::state::AppState;

/// Running server handle
pub struct Server {
    addr: SocketAddr,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl Server {
    /// Start serving on `addr` (port 0 picks a free port)
    pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;
        let bound_addr = listener.local_addr()?;

        info!(addr = %bound_addr, "Server started");

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let app = router(state);

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                    info!("Server shutting down");
                })
                .await
        });

        Ok(Server {
            addr: bound_addr,
            shutdown_tx,
            task,
        })
    }

    /// Get the server's bound address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and drain in-flight requests
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Wait for the serve task to finish
    pub async fn wait(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result.map_err(Error::Io),
            Err(e) => Err(Error::Task(e.to_string())),
        }
    }
}
