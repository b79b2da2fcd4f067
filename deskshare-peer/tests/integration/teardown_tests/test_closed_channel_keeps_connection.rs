use deskshare_peer::{InputChannel, NegotiationState};

use crate::integration::init_tracing;
use crate::integration::teardown_tests::click;
use crate::utils::{MockNetwork, TestPeer, connect_pair};

#[tokio::test]
async fn test_closed_channel_keeps_connection() {
    init_tracing();
    let network = MockNetwork::new();
    let mut host = TestPeer::host(&network);
    let mut guest = TestPeer::guest(&network);
    connect_pair(&mut host, &mut guest).await;

    let channel = guest
        .negotiator
        .record(&host.id)
        .and_then(|r| r.channel().cloned())
        .unwrap();
    channel.close().await.unwrap();
    host.process_transport_events().await;

    let record = host.negotiator.record(&guest.id).unwrap();
    assert!(!record.has_open_channel());
    assert_eq!(record.state(), NegotiationState::Connected);
    assert_eq!(host.negotiator.connected_participants(), &[guest.id]);
    assert_eq!(
        host.negotiator.send_input_event(&click(), None).await.unwrap(),
        0
    );
}
