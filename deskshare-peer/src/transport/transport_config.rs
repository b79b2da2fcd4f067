use deskshare_core::IceServerConfig;

/// ICE configuration handed to every transport the factory creates.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl TransportConfig {
    /// Adopt the servers distributed by the relay. An empty list keeps the current ones.
    pub fn apply_relay_servers(&mut self, ice_servers: Vec<IceServerConfig>) {
        if !ice_servers.is_empty() {
            self.ice_servers = ice_servers;
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: IceServerConfig::default_stun(),
        }
    }
}
