//! Server listener
//!
//! Binds the HTTP listener, starts the station's advancer and serves the
//! routes until shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::config::ServerConfig;
use super::routes::{router, AppState};
use crate::error::Result;
use crate::library;
use crate::station::Station;

/// HTTP server for one station
pub struct AmbientServer {
    config: ServerConfig,
    station: Arc<Station>,
}

impl AmbientServer {
    /// Create a new server with an empty station
    pub fn new(config: ServerConfig) -> Self {
        let station = Arc::new(Station::new(config.station.clone()));
        Self::with_station(config, station)
    }

    /// Create a new server around an existing station
    pub fn with_station(config: ServerConfig, station: Arc<Station>) -> Self {
        Self { config, station }
    }

    /// Get a reference to the station
    pub fn station(&self) -> &Arc<Station> {
        &self.station
    }

    /// Get the bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Fill the playlist from the configured media directories
    pub async fn seed_library(&self) -> Result<usize> {
        let added = library::seed(self.station.store(), &self.config.library).await?;
        Ok(added)
    }

    /// Build the router with a shutdown signal for open event streams
    pub fn router(&self, shutdown: watch::Receiver<bool>) -> Router {
        let state = AppState::new(Arc::clone(&self.station), &self.config, shutdown);
        router(state, &self.config)
    }

    /// Run the server
    ///
    /// This method blocks until the server fails.
    pub async fn run(&self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server with graceful shutdown
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            addr = %listener.local_addr()?,
            items = self.station.store().len(),
            "Ambient TV server listening"
        );

        let (stop_tx, stop_rx) = watch::channel(false);
        let app = self.router(stop_rx);

        let advancer = self.station.spawn_advancer();

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
                // End open event streams so connections can drain
                let _ = stop_tx.send(true);
            })
            .await;

        // Stop the advancer on shutdown
        advancer.abort();

        result.map_err(Into::into)
    }
}
