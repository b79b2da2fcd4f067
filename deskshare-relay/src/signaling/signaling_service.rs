use crate::hub::RelayCommand;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use deskshare_core::{IceServerConfig, ParticipantId, RelaySignal};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    participants: DashMap<ParticipantId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

/// Attached WebSocket participants plus the command channel into the relay hub.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) hub_tx: mpsc::Sender<RelayCommand>,
}

impl SignalingService {
    pub fn new(hub_tx: mpsc::Sender<RelayCommand>, ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                participants: DashMap::new(),
                ice_servers,
            }),
            hub_tx,
        }
    }

    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn add_participant(&self, participant: ParticipantId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.participants.insert(participant, tx);
    }

    pub fn remove_participant(&self, participant: &ParticipantId) {
        self.inner.participants.remove(participant);
    }

    pub fn participant_count(&self) -> usize {
        self.inner.participants.len()
    }

    pub fn send(&self, participant: ParticipantId, signal: &RelaySignal) {
        let Some(tx) = self.inner.participants.get(&participant) else {
            warn!(
                "Attempted to send signal to detached participant {}",
                participant
            );
            return;
        };

        match serde_json::to_string(signal) {
            Ok(json) => {
                if let Err(e) = tx.send(Message::Text(json.into())) {
                    error!("Failed to send WS message to {}: {:?}", participant, e);
                }
            }
            Err(e) => error!("Failed to serialize relay signal: {}", e),
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_signal(&self, participant: ParticipantId, signal: RelaySignal) {
        self.send(participant, &signal);
    }
}
