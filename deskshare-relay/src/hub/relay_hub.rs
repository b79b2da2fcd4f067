use crate::hub::RelayCommand;
use crate::room::{Departure, RoomRegistry};
use crate::signaling::SignalingOutput;
use deskshare_core::{ClientSignal, ParticipantId, RelaySignal, RoomCode};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Single-task owner of the room registry. Commands are handled strictly in
/// arrival order, so membership updates never race with the notifications
/// that follow them.
pub struct RelayHub {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RelayCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RelayHub {
    pub fn new(command_rx: mpsc::Receiver<RelayCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            command_rx,
            signaling,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub async fn run(mut self) {
        info!("Relay hub started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Relay hub stopped.");
    }

    pub async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Signal { from, signal } => self.handle_signal(from, signal).await,
            RelayCommand::Disconnect { participant } => {
                match self.registry.remove_participant(&participant) {
                    Some(Departure::RoomClosed { room, orphaned }) => debug!(
                        "Room {} closed by host departure; {} members left without a room",
                        room,
                        orphaned.len()
                    ),
                    Some(Departure::Left { room }) => {
                        debug!("{} disconnected from room {}", participant, room)
                    }
                    None => debug!("{} disconnected outside any room", participant),
                }
            }
        }
    }

    async fn handle_signal(&mut self, from: ParticipantId, signal: ClientSignal) {
        match signal {
            ClientSignal::Join { room } => {
                let outcome = self.registry.join(&room, from);

                self.signaling
                    .send_signal(
                        from,
                        RelaySignal::Joined {
                            room: room.clone(),
                            role: outcome.role,
                        },
                    )
                    .await;

                for member in outcome.existing {
                    self.signaling
                        .send_signal(
                            member,
                            RelaySignal::ParticipantJoined {
                                participant_id: from,
                            },
                        )
                        .await;
                }
            }

            ClientSignal::RequestConnection { room } => {
                if !self.registry.is_member(&room, &from) {
                    warn!(
                        "Dropping connection request from {}: not a member of room {}",
                        from, room
                    );
                    return;
                }

                for member in self.registry.members_except(&room, &from) {
                    self.signaling
                        .send_signal(member, RelaySignal::ConnectionRequested { from })
                        .await;
                }
            }

            ClientSignal::Offer {
                room,
                target,
                payload,
            } => {
                self.forward(&room, from, target, RelaySignal::Offer { from, payload })
                    .await;
            }

            ClientSignal::Answer {
                room,
                target,
                payload,
            } => {
                self.forward(&room, from, target, RelaySignal::Answer { from, payload })
                    .await;
            }

            ClientSignal::IceCandidate {
                room,
                target,
                payload,
            } => {
                self.forward(
                    &room,
                    from,
                    target,
                    RelaySignal::IceCandidate { from, payload },
                )
                .await;
            }
        }
    }

    /// Route a signal to `target` when both ends are members of `room`.
    async fn forward(
        &self,
        room: &RoomCode,
        from: ParticipantId,
        target: ParticipantId,
        signal: RelaySignal,
    ) {
        if !self.registry.is_member(room, &from) {
            warn!("Dropping signal from {}: not a member of room {}", from, room);
            return;
        }
        if !self.registry.is_member(room, &target) {
            warn!(
                "Dropping signal from {} to {}: target not in room {}",
                from, target, room
            );
            return;
        }

        debug!("Forwarding signal {} -> {} in room {}", from, target, room);
        self.signaling.send_signal(target, signal).await;
    }
}
