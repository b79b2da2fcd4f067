use crate::PeerError;
use crate::relay::RelayOutput;
use async_trait::async_trait;
use deskshare_core::{ClientSignal, ParticipantId, RelaySignal, RoomCode, SignalPayload};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// WebSocket connection to the relay, scoped to one room.
///
/// A writer task drains outbound signals and a reader task parses inbound
/// ones. Both are aborted when the client is dropped.
pub struct RelayClient {
    room: RoomCode,
    outbound: mpsc::UnboundedSender<ClientSignal>,
    writer: JoinHandle<()>,
    reader: JoinHandle<()>,
}

impl RelayClient {
    pub async fn connect(
        url: &str,
        room: RoomCode,
    ) -> Result<(Self, mpsc::UnboundedReceiver<RelaySignal>), PeerError> {
        let (ws, _) = connect_async(url).await?;
        info!("Connected to relay at {}", url);

        let (mut sink, mut stream) = ws.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<ClientSignal>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<RelaySignal>();

        let writer = tokio::spawn(async move {
            while let Some(signal) = outbound_rx.recv().await {
                let json = match serde_json::to_string(&signal) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize client signal: {}", e);
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(json.into())).await {
                    warn!("Relay write failed: {}", e);
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader = tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<RelaySignal>(text.as_str()) {
                            Ok(signal) => {
                                debug!("Relay IN: {:?}", signal);
                                if inbound_tx.send(signal).is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("Invalid RelaySignal: {}", e),
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay read failed: {}", e);
                        break;
                    }
                }
            }
            info!("Relay connection closed");
        });

        let client = Self {
            room,
            outbound,
            writer,
            reader,
        };
        Ok((client, inbound_rx))
    }

    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    pub fn join(&self) {
        self.send(ClientSignal::Join {
            room: self.room.clone(),
        });
    }

    fn send(&self, signal: ClientSignal) {
        debug!("Relay OUT: {:?}", signal);
        if self.outbound.send(signal).is_err() {
            warn!("Relay writer stopped; signal dropped");
        }
    }
}

#[async_trait]
impl RelayOutput for RelayClient {
    async fn request_connection(&self) {
        self.send(ClientSignal::RequestConnection {
            room: self.room.clone(),
        });
    }

    async fn send_offer(&self, target: ParticipantId, payload: SignalPayload) {
        self.send(ClientSignal::Offer {
            room: self.room.clone(),
            target,
            payload,
        });
    }

    async fn send_answer(&self, target: ParticipantId, payload: SignalPayload) {
        self.send(ClientSignal::Answer {
            room: self.room.clone(),
            target,
            payload,
        });
    }

    async fn send_ice(&self, target: ParticipantId, payload: SignalPayload) {
        self.send(ClientSignal::IceCandidate {
            room: self.room.clone(),
            target,
            payload,
        });
    }
}

impl Drop for RelayClient {
    fn drop(&mut self) {
        self.writer.abort();
        self.reader.abort();
    }
}
