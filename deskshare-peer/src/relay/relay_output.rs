use async_trait::async_trait;
use deskshare_core::{ParticipantId, SignalPayload};

/// Outbound half of the relay protocol as seen by the negotiator.
/// Delivery is best-effort; implementations log failures instead of returning them.
#[async_trait]
pub trait RelayOutput: Send + Sync {
    async fn request_connection(&self);

    async fn send_offer(&self, target: ParticipantId, payload: SignalPayload);

    async fn send_answer(&self, target: ParticipantId, payload: SignalPayload);

    async fn send_ice(&self, target: ParticipantId, payload: SignalPayload);
}
