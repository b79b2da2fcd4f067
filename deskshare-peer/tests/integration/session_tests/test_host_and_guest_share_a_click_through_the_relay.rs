use deskshare_core::{IceServerConfig, InputEvent, InputKind, ReceivedInput, Role};
use deskshare_peer::PeerEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::integration::init_tracing;
use crate::integration::session_tests::{ROOM, join, send_until_delivered};
use crate::utils::{
    MockNetwork, MockTransportFactory, SESSION_TIMEOUT_MS, spawn_relay, wait_for_connected,
};

#[tokio::test]
async fn test_host_and_guest_share_a_click_through_the_relay() {
    init_tracing();
    let url = spawn_relay(IceServerConfig::default_stun()).await;
    let network = MockNetwork::new();
    let host_factory = Arc::new(MockTransportFactory::new(&network));
    let guest_factory = Arc::new(MockTransportFactory::new(&network));

    let (host, mut host_events) = join(&url, &host_factory).await;
    assert_eq!(host.role(), Role::Host);
    assert_eq!(host.room().as_str(), ROOM);

    let (guest, _guest_events) = join(&url, &guest_factory).await;
    assert_eq!(guest.role(), Role::Guest);

    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    guest
        .set_input_callback(move |input: ReceivedInput| {
            let _ = input_tx.send(input);
        })
        .await
        .unwrap();

    wait_for_connected(&host, &[guest.local_id()]).await;
    wait_for_connected(&guest, &[host.local_id()]).await;

    let connected = timeout(Duration::from_millis(SESSION_TIMEOUT_MS), host_events.recv())
        .await
        .expect("Timeout waiting for peer event");
    assert!(matches!(
        connected,
        Some(PeerEvent::ParticipantConnected(id)) if id == guest.local_id()
    ));

    let click = InputEvent::new(InputKind::Click {
        x: 50.0,
        y: 50.0,
        button: 0,
    });
    send_until_delivered(&host, click.clone()).await;

    let received = timeout(Duration::from_millis(SESSION_TIMEOUT_MS), input_rx.recv())
        .await
        .expect("Timeout waiting for input")
        .expect("Input callback dropped");
    assert_eq!(
        received,
        ReceivedInput {
            sender_id: host.local_id(),
            event: click,
        }
    );

    // Only the host offers.
    assert_eq!(host_factory.created_count(), 1);
    assert_eq!(guest_factory.created_count(), 1);
}
