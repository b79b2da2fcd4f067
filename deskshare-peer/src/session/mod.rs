mod peer_event;
mod peer_session;
mod session_command;
mod session_config;
mod session_handle;

pub use peer_event::PeerEvent;
pub use peer_session::PeerSession;
pub use session_command::SessionCommand;
pub use session_config::SessionConfig;
pub use session_handle::SessionHandle;
