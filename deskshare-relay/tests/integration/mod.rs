//! Integration tests for deskshare-relay.
//!
//! Tests are organized by functionality:
//! - `hub_tests` - room bookkeeping and forwarding inside the hub
//! - `websocket_tests` - clients talking to a served relay

pub mod websocket_tests;

use deskshare_core::ParticipantId;
use deskshare_relay::{RelayCommand, RelayHub};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::MockSignalingOutput;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A hub that is driven directly through `handle_command`.
pub fn create_test_hub() -> (RelayHub, MockSignalingOutput) {
    let (_cmd_tx, cmd_rx) = mpsc::channel::<RelayCommand>(100);
    let (signaling, _signal_rx) = MockSignalingOutput::new();
    let hub = RelayHub::new(cmd_rx, Arc::new(signaling.clone()));
    (hub, signaling)
}

/// A hub running on its own task, fed through its command channel.
pub fn spawn_test_hub() -> (
    mpsc::Sender<RelayCommand>,
    mpsc::UnboundedReceiver<(ParticipantId, deskshare_core::RelaySignal)>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<RelayCommand>(100);
    let (signaling, signal_rx) = MockSignalingOutput::new();
    let hub = RelayHub::new(cmd_rx, Arc::new(signaling));

    tokio::spawn(hub.run());

    (cmd_tx, signal_rx)
}
