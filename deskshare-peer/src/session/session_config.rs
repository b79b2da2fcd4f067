use crate::transport::TransportConfig;
use deskshare_core::RoomCode;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint of the relay, e.g. `ws://127.0.0.1:3000/ws`.
    pub relay_url: String,
    pub room: RoomCode,
    pub transport: TransportConfig,
}

impl SessionConfig {
    pub fn new(relay_url: impl Into<String>, room: impl Into<RoomCode>) -> Self {
        Self {
            relay_url: relay_url.into(),
            room: room.into(),
            transport: TransportConfig::default(),
        }
    }
}
