use async_trait::async_trait;
use deskshare_core::{ParticipantId, RelaySignal};

/// Delivery side of the relay: pushes a signal to one attached participant.
/// Delivery is best-effort; a participant that is gone is logged and skipped.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send_signal(&self, participant: ParticipantId, signal: RelaySignal);
}
