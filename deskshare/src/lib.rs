pub use deskshare_core::{ParticipantId, ProtocolError, Role, RoomCode};

pub mod model {
    pub use deskshare_core::model::*;
    pub use deskshare_core::utils::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use deskshare_relay::*;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use deskshare_peer::*;
}
