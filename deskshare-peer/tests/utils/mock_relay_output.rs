use async_trait::async_trait;
use deskshare_core::{ParticipantId, RelaySignal, SignalPayload};
use deskshare_peer::RelayOutput;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A signal the negotiator asked the relay to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    RequestConnection,
    Offer {
        target: ParticipantId,
        payload: SignalPayload,
    },
    Answer {
        target: ParticipantId,
        payload: SignalPayload,
    },
    Ice {
        target: ParticipantId,
        payload: SignalPayload,
    },
}

impl Outbound {
    pub fn target(&self) -> Option<ParticipantId> {
        match self {
            Outbound::RequestConnection => None,
            Outbound::Offer { target, .. }
            | Outbound::Answer { target, .. }
            | Outbound::Ice { target, .. } => Some(*target),
        }
    }

    /// The signal as the relay would deliver it to the target.
    pub fn deliver_as(&self, from: ParticipantId) -> RelaySignal {
        match self.clone() {
            Outbound::RequestConnection => RelaySignal::ConnectionRequested { from },
            Outbound::Offer { payload, .. } => RelaySignal::Offer { from, payload },
            Outbound::Answer { payload, .. } => RelaySignal::Answer { from, payload },
            Outbound::Ice { payload, .. } => RelaySignal::IceCandidate { from, payload },
        }
    }

    pub fn is_offer(&self) -> bool {
        matches!(self, Outbound::Offer { .. })
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Outbound::Answer { .. })
    }

    pub fn is_ice(&self) -> bool {
        matches!(self, Outbound::Ice { .. })
    }
}

/// RelayOutput that queues everything for the test to route by hand.
#[derive(Clone, Default)]
pub struct MockRelayOutput {
    queue: Arc<Mutex<VecDeque<Outbound>>>,
    history: Arc<Mutex<Vec<Outbound>>>,
}

impl MockRelayOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything not yet routed.
    pub fn take(&self) -> Vec<Outbound> {
        self.queue.lock().unwrap().drain(..).collect()
    }

    pub fn history(&self) -> Vec<Outbound> {
        self.history.lock().unwrap().clone()
    }

    pub fn offer_count(&self) -> usize {
        self.history().iter().filter(|o| o.is_offer()).count()
    }

    fn push(&self, outbound: Outbound) {
        tracing::debug!("[MockRelay] {:?}", outbound);
        self.history.lock().unwrap().push(outbound.clone());
        self.queue.lock().unwrap().push_back(outbound);
    }
}

#[async_trait]
impl RelayOutput for MockRelayOutput {
    async fn request_connection(&self) {
        self.push(Outbound::RequestConnection);
    }

    async fn send_offer(&self, target: ParticipantId, payload: SignalPayload) {
        self.push(Outbound::Offer { target, payload });
    }

    async fn send_answer(&self, target: ParticipantId, payload: SignalPayload) {
        self.push(Outbound::Answer { target, payload });
    }

    async fn send_ice(&self, target: ParticipantId, payload: SignalPayload) {
        self.push(Outbound::Ice { target, payload });
    }
}
