use deskshare_peer::InputChannel;

use crate::integration::init_tracing;
use crate::integration::input_tests::click;
use crate::utils::{MockNetwork, TestPeer, connect_pair};

#[tokio::test]
async fn test_broadcast_skips_closed_channels() {
    init_tracing();
    let network = MockNetwork::new();
    let mut host = TestPeer::host(&network);
    let mut guests = vec![
        TestPeer::guest(&network),
        TestPeer::guest(&network),
        TestPeer::guest(&network),
    ];
    for guest in guests.iter_mut() {
        connect_pair(&mut host, guest).await;
    }

    // The host has not yet seen the close, so its record still holds the channel.
    let closed = guests[2]
        .negotiator
        .record(&host.id)
        .and_then(|r| r.channel().cloned())
        .unwrap();
    closed.close().await.unwrap();

    let sent = host
        .negotiator
        .send_input_event(&click(25.0, 75.0), None)
        .await
        .unwrap();
    assert_eq!(sent, 2);

    for guest in guests.iter_mut().take(2) {
        guest.process_transport_events().await;
        assert_eq!(guest.received_inputs().len(), 1);
    }
    guests[2].process_transport_events().await;
    assert!(guests[2].received_inputs().is_empty());
}
