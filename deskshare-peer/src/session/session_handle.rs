use crate::PeerError;
use crate::negotiation::InputCallback;
use crate::session::SessionCommand;
use crate::transport::TransportId;
use deskshare_core::{InputEvent, ParticipantId, ReceivedInput, Role, RoomCode};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// Cloneable front end of a running [`PeerSession`](crate::PeerSession).
#[derive(Clone)]
pub struct SessionHandle {
    local_id: ParticipantId,
    role: Role,
    room: RoomCode,
    command_tx: mpsc::Sender<SessionCommand>,
    connected_rx: watch::Receiver<Vec<ParticipantId>>,
}

impl SessionHandle {
    pub(crate) fn new(
        local_id: ParticipantId,
        role: Role,
        room: RoomCode,
        command_tx: mpsc::Sender<SessionCommand>,
        connected_rx: watch::Receiver<Vec<ParticipantId>>,
    ) -> Self {
        Self {
            local_id,
            role,
            room,
            command_tx,
            connected_rx,
        }
    }

    pub fn local_id(&self) -> ParticipantId {
        self.local_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn room(&self) -> &RoomCode {
        &self.room
    }

    pub async fn start_call(&self, remote: ParticipantId) -> Result<TransportId, PeerError> {
        let (reply, rx) = oneshot::channel();
        self.command(SessionCommand::StartCall { remote, reply })
            .await?;
        rx.await.map_err(|_| PeerError::SessionClosed)?
    }

    /// Out-of-range pointer events are rejected here, before reaching the session.
    pub async fn send_input_event(
        &self,
        event: InputEvent,
        target: Option<ParticipantId>,
    ) -> Result<usize, PeerError> {
        event.validate()?;

        let (reply, rx) = oneshot::channel();
        self.command(SessionCommand::SendInput {
            event,
            target,
            reply,
        })
        .await?;
        rx.await.map_err(|_| PeerError::SessionClosed)?
    }

    pub async fn set_input_callback<F>(&self, callback: F) -> Result<(), PeerError>
    where
        F: Fn(ReceivedInput) + Send + Sync + 'static,
    {
        let callback: InputCallback = Arc::new(callback);
        self.command(SessionCommand::SetInputCallback(callback))
            .await
    }

    /// Connected participants, ordered by connection completion.
    pub fn connected_participants(&self) -> Vec<ParticipantId> {
        self.connected_rx.borrow().clone()
    }

    pub fn watch_connected(&self) -> watch::Receiver<Vec<ParticipantId>> {
        self.connected_rx.clone()
    }

    pub async fn shutdown(&self) -> Result<(), PeerError> {
        self.command(SessionCommand::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn command(&self, cmd: SessionCommand) -> Result<(), PeerError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| PeerError::SessionClosed)
    }
}
