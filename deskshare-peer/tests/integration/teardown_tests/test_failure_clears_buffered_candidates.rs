use deskshare_core::{IceCandidate, ParticipantId, RelaySignal};

use crate::integration::init_tracing;
use crate::utils::{MockNetwork, TestPeer};

#[tokio::test]
async fn test_failure_clears_buffered_candidates() {
    init_tracing();
    let network = MockNetwork::new();
    let mut host = TestPeer::host(&network);
    let guest = ParticipantId::new();

    host.negotiator.start_call(guest).await.unwrap();
    let early = IceCandidate::new("candidate:mock 77 1 udp 1 127.0.0.1 9 typ host");
    host.negotiator
        .handle_signal(RelaySignal::IceCandidate {
            from: guest,
            payload: early.to_payload().unwrap(),
        })
        .await;
    assert_eq!(host.negotiator.pending_candidates(&guest), 1);

    host.factory.latest_for(&guest).unwrap().fail();
    host.process_transport_events().await;

    assert_eq!(host.negotiator.pending_candidates(&guest), 0);
    assert!(host.negotiator.record(&guest).is_none());
}
