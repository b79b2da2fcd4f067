pub mod test_host_and_guest_share_a_click_through_the_relay;

use deskshare_core::InputEvent;
use deskshare_peer::{PeerEvent, PeerSession, SessionConfig, SessionHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::utils::{MockTransportFactory, SESSION_TIMEOUT_MS};

pub const ROOM: &str = "482913";

pub async fn join(
    url: &str,
    factory: &Arc<MockTransportFactory>,
) -> (SessionHandle, mpsc::UnboundedReceiver<PeerEvent>) {
    PeerSession::connect(SessionConfig::new(url, ROOM), factory.clone())
        .await
        .expect("Failed to join room")
}

/// The connected view can lead the channel opening, so retry until a channel takes the packet.
pub async fn send_until_delivered(handle: &SessionHandle, event: InputEvent) {
    let deadline = Instant::now() + Duration::from_millis(SESSION_TIMEOUT_MS);
    loop {
        let sent = handle.send_input_event(event.clone(), None).await.unwrap();
        if sent > 0 {
            return;
        }
        assert!(Instant::now() < deadline, "Input channel never opened");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
