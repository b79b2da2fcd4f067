use crate::PeerError;
use crate::negotiation::InputCallback;
use crate::transport::TransportId;
use deskshare_core::{InputEvent, ParticipantId};
use tokio::sync::oneshot;

/// Requests from a [`SessionHandle`](crate::SessionHandle) to the session actor.
pub enum SessionCommand {
    StartCall {
        remote: ParticipantId,
        reply: oneshot::Sender<Result<TransportId, PeerError>>,
    },
    SendInput {
        event: InputEvent,
        target: Option<ParticipantId>,
        reply: oneshot::Sender<Result<usize, PeerError>>,
    },
    SetInputCallback(InputCallback),
    Shutdown,
}
