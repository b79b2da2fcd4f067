use deskshare_core::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("failed to reach relay: {0}")]
    RelayConnect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("relay closed the connection during the join handshake")]
    RelayClosed,

    #[error("relay refused the session: {0}")]
    Rejected(String),

    #[error("peer session is closed")]
    SessionClosed,

    #[error("transport failure: {0:#}")]
    Transport(#[from] anyhow::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
