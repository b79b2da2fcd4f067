use crate::transport::{EventSink, SignalingState, TransportConfig};
use anyhow::Result;
use async_trait::async_trait;
use deskshare_core::{IceCandidate, SessionDescription};
use std::sync::Arc;

/// One peer-to-peer transport toward a single remote participant.
///
/// Everything the transport observes asynchronously (state changes, gathered
/// candidates, channel traffic) is reported through the [`EventSink`] it was
/// created with rather than through callbacks on this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    fn signaling_state(&self) -> SignalingState;

    async fn has_remote_description(&self) -> bool;

    /// Open the outbound input channel. Readiness is reported as
    /// `TransportEventKind::ChannelOpen`.
    async fn open_input_channel(&self) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait TransportFactory: Send + Sync {
    async fn create(&self, config: &TransportConfig, events: EventSink)
    -> Result<Arc<dyn Transport>>;
}
