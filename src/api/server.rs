//! API server lifecycle: starts and stops the axum HTTP server.
//!
//! Pattern: bind → spawn background task → return a handle with a
//! shutdown channel. The handle owns the task so callers can wait for
//! in-flight requests to drain.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::clinic_api_router;
use crate::db::Database;

/// Handle to a running API server.
pub struct ApiServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Binds the listener and spawns the server in a background task.
    pub async fn start(db: Database, addr: SocketAddr) -> Result<Self, std::io::Error> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        let app = clinic_api_router(db);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let shutdown_signal = async move {
                let _ = shutdown_rx.await;
                tracing::info!("API server received shutdown signal");
            };

            tracing::info!(%addr, "API server started");

            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal)
                .await
            {
                tracing::error!("API server error: {e}");
            }

            tracing::info!("API server stopped");
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }

    /// The bound address. Differs from the requested one when port 0 was
    /// asked for.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signals shutdown and waits for the server task to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("API server task join error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::db::pool::tests::unreachable_database;

    async fn start_on_loopback() -> ApiServer {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        ApiServer::start(unreachable_database(), addr)
            .await
            .expect("server should start")
    }

    #[tokio::test]
    async fn serves_health_then_stops_cleanly() {
        let server = start_on_loopback().await;
        let url = format!("http://{}/api/health", server.addr());

        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "OK");

        server.stop().await;

        // Listener is gone once stop() returns.
        assert!(reqwest::get(&url).await.is_err());
    }

    #[tokio::test]
    async fn unknown_route_returns_404_over_http() {
        let server = start_on_loopback().await;

        let url = format!("http://{}/nonexistent", server.addr());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.stop().await;
    }

    #[tokio::test]
    async fn start_fails_when_the_port_is_taken() {
        let first = start_on_loopback().await;

        let result = ApiServer::start(unreachable_database(), first.addr()).await;
        assert!(result.is_err());

        first.stop().await;
    }
}
