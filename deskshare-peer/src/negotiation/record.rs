use crate::negotiation::NegotiationState;
use crate::transport::{InputChannel, Transport, TransportId, TransportState};
use deskshare_core::ParticipantId;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the local side holds for one remote participant.
pub struct RemoteConnection {
    remote: ParticipantId,
    transport: Arc<dyn Transport>,
    transport_id: TransportId,
    state: NegotiationState,
    /// Set when the local side sent the first offer.
    initiator: bool,
    transport_state: TransportState,
    channel: Option<Arc<dyn InputChannel>>,
}

impl RemoteConnection {
    pub(crate) fn new(
        remote: ParticipantId,
        transport: Arc<dyn Transport>,
        transport_id: TransportId,
    ) -> Self {
        Self {
            remote,
            transport,
            transport_id,
            state: NegotiationState::Idle,
            initiator: false,
            transport_state: TransportState::New,
            channel: None,
        }
    }

    pub fn remote(&self) -> ParticipantId {
        self.remote
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn transport_id(&self) -> TransportId {
        self.transport_id
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn is_initiator(&self) -> bool {
        self.initiator
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport_state
    }

    pub fn channel(&self) -> Option<&Arc<dyn InputChannel>> {
        self.channel.as_ref()
    }

    pub fn has_open_channel(&self) -> bool {
        self.channel.as_ref().is_some_and(|ch| ch.is_open())
    }

    /// Apply `next` if the state machine allows it.
    pub(crate) fn transition(&mut self, next: NegotiationState) -> bool {
        if !self.state.can_transition_to(next) {
            warn!(
                "Rejected transition {} -> {} for {}",
                self.state, next, self.remote
            );
            return false;
        }

        debug!("{}: {} -> {}", self.remote, self.state, next);
        self.state = next;
        true
    }

    pub(crate) fn mark_initiator(&mut self) {
        self.initiator = true;
    }

    pub(crate) fn set_transport_state(&mut self, state: TransportState) {
        self.transport_state = state;
    }

    pub(crate) fn set_channel(&mut self, channel: Arc<dyn InputChannel>) {
        self.channel = Some(channel);
    }

    pub(crate) fn take_channel(&mut self) -> Option<Arc<dyn InputChannel>> {
        self.channel.take()
    }
}
