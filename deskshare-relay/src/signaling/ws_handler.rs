use crate::{RelayCommand, SignalingService};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use deskshare_core::{ClientSignal, ParticipantId, RelaySignal};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let participant = ParticipantId::new();
    info!("New relay connection: {}", participant);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_participant(participant, tx);
    service.send(
        participant,
        &RelaySignal::Welcome {
            participant_id: participant,
        },
    );
    service.send(
        participant,
        &RelaySignal::IceConfig {
            ice_servers: service.ice_servers(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientSignal>(&text) {
                        Ok(signal) => {
                            debug!("Relay IN from {}: {:?}", participant, signal);
                            let cmd = RelayCommand::Signal {
                                from: participant,
                                signal,
                            };
                            if let Err(e) = service.hub_tx.send(cmd).await {
                                error!("Relay hub stopped: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid ClientSignal from {}: {}", participant, e);
                            service.send(
                                participant,
                                &RelaySignal::Error {
                                    message: format!("invalid signal: {e}"),
                                },
                            );
                        }
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    let _ = service
        .hub_tx
        .send(RelayCommand::Disconnect { participant })
        .await;

    service.remove_participant(&participant);
    info!("Relay connection closed: {}", participant);
}
