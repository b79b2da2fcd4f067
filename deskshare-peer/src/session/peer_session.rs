use crate::PeerError;
use crate::negotiation::Negotiator;
use crate::relay::{RelayClient, RelayOutput};
use crate::session::{PeerEvent, SessionCommand, SessionConfig, SessionHandle};
use crate::transport::{TransportEvent, TransportFactory};
use deskshare_core::{ParticipantId, RelaySignal, Role};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Actor tying a relay connection to a [`Negotiator`].
///
/// Relay signals, transport events and handle commands are processed one at a
/// time on the session task. Every record is closed when the loop ends.
pub struct PeerSession {
    negotiator: Negotiator,
    signal_rx: mpsc::UnboundedReceiver<RelaySignal>,
    transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
}

impl PeerSession {
    /// Attach to the relay, join the configured room and spawn the session task.
    pub async fn connect(
        mut config: SessionConfig,
        factory: Arc<dyn TransportFactory>,
    ) -> Result<(SessionHandle, mpsc::UnboundedReceiver<PeerEvent>), PeerError> {
        let (relay, mut signal_rx) =
            RelayClient::connect(&config.relay_url, config.room.clone()).await?;

        let (local_id, role) = handshake(&relay, &mut signal_rx, &mut config).await?;
        info!("Joined room {} as {} ({})", config.room, role, local_id);

        let relay = Arc::new(relay);
        if !role.is_host() {
            relay.request_connection().await;
        }

        let (peer_events_tx, peer_events_rx) = mpsc::unbounded_channel();
        let (negotiator, transport_rx) =
            Negotiator::new(local_id, role, config.transport, factory, relay);
        let negotiator = negotiator.with_peer_events(peer_events_tx);

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let handle = SessionHandle::new(
            local_id,
            role,
            config.room,
            command_tx,
            negotiator.watch_connected(),
        );

        let session = Self {
            negotiator,
            signal_rx,
            transport_rx,
            command_rx,
        };
        tokio::spawn(session.run());

        Ok((handle, peer_events_rx))
    }

    async fn run(mut self) {
        info!("Peer session {} started", self.negotiator.local_id());

        loop {
            tokio::select! {
                signal = self.signal_rx.recv() => match signal {
                    Some(signal) => self.negotiator.handle_signal(signal).await,
                    None => {
                        warn!("Relay connection lost. Ending session.");
                        break;
                    }
                },

                Some(event) = self.transport_rx.recv() => {
                    self.negotiator.handle_transport_event(event).await;
                }

                cmd = self.command_rx.recv() => match cmd {
                    Some(SessionCommand::Shutdown) => {
                        info!("Shutdown requested");
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd).await,
                    None => {
                        info!("All session handles dropped");
                        break;
                    }
                },
            }
        }

        self.negotiator.shutdown().await;
        info!("Peer session {} finished", self.negotiator.local_id());
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::StartCall { remote, reply } => {
                let _ = reply.send(self.negotiator.start_call(remote).await);
            }
            SessionCommand::SendInput {
                event,
                target,
                reply,
            } => {
                let _ = reply.send(self.negotiator.send_input_event(&event, target).await);
            }
            SessionCommand::SetInputCallback(callback) => {
                debug!("Input callback registered");
                self.negotiator.set_input_callback(callback);
            }
            SessionCommand::Shutdown => {}
        }
    }
}

/// `Welcome` and `IceConfig` arrive unprompted on attach; `Join` is sent once
/// the id is known and the handshake ends at `Joined`.
async fn handshake(
    relay: &RelayClient,
    signal_rx: &mut mpsc::UnboundedReceiver<RelaySignal>,
    config: &mut SessionConfig,
) -> Result<(ParticipantId, Role), PeerError> {
    let mut local_id = None;

    while let Some(signal) = signal_rx.recv().await {
        match signal {
            RelaySignal::Welcome { participant_id } => {
                debug!("Relay assigned id {}", participant_id);
                local_id = Some(participant_id);
                relay.join();
            }
            RelaySignal::IceConfig { ice_servers } => {
                debug!("Relay provided {} ICE server entries", ice_servers.len());
                config.transport.apply_relay_servers(ice_servers);
            }
            RelaySignal::Joined { role, .. } => {
                let local_id = local_id
                    .ok_or_else(|| PeerError::Rejected("joined before welcome".to_owned()))?;
                return Ok((local_id, role));
            }
            RelaySignal::Error { message } => return Err(PeerError::Rejected(message)),
            other => debug!("Ignoring {:?} during handshake", other),
        }
    }

    Err(PeerError::RelayClosed)
}
