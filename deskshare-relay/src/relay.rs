use crate::hub::{RelayCommand, RelayHub};
use crate::signaling::{SignalingService, ws_handler};
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use deskshare_core::IceServerConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

const HUB_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    /// Handed to every participant on attach.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            ice_servers: IceServerConfig::default_stun(),
        }
    }
}

/// A running relay hub plus the HTTP surface in front of it.
pub struct Relay {
    service: SignalingService,
    hub: JoinHandle<()>,
}

impl Relay {
    /// Spawn the hub task. Must be called inside a tokio runtime.
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        let (hub_tx, hub_rx) = mpsc::channel::<RelayCommand>(HUB_CHANNEL_CAPACITY);
        let service = SignalingService::new(hub_tx, ice_servers);
        let hub = RelayHub::new(hub_rx, Arc::new(service.clone()));

        Self {
            service,
            hub: tokio::spawn(hub.run()),
        }
    }

    pub fn service(&self) -> &SignalingService {
        &self.service
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/ws", get(ws_handler))
            .layer(cors)
            .with_state(self.service.clone())
    }

    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr().context("Listener has no local address")?;
        info!("Relay listening on ws://{}/ws", addr);

        axum::serve(listener, self.router())
            .await
            .context("Relay server terminated")
    }

    pub async fn bind_and_serve(config: RelayConfig) -> Result<()> {
        let listener = TcpListener::bind(config.bind)
            .await
            .with_context(|| format!("Failed to bind relay to {}", config.bind))?;

        Self::new(config.ice_servers).serve(listener).await
    }
}

impl Drop for Relay {
    fn drop(&mut self) {
        self.hub.abort();
    }
}
