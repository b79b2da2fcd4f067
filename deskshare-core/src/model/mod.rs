mod input;
mod participant;
mod room;
mod signaling;

pub use input::{InputEvent, InputKind, ReceivedInput};
pub use participant::{ParticipantId, Role};
pub use room::RoomCode;
pub use signaling::{
    ClientSignal, IceCandidate, IceServerConfig, RelaySignal, SdpKind, SessionDescription,
    SignalPayload,
};
