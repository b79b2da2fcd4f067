use deskshare_core::ParticipantId;
use deskshare_peer::{NegotiationState, TransportEventKind, TransportState};

use crate::integration::init_tracing;
use crate::utils::{MockNetwork, TestPeer};

#[tokio::test]
async fn test_event_from_replaced_transport_is_ignored() {
    init_tracing();
    let network = MockNetwork::new();
    let mut host = TestPeer::host(&network);
    let guest = ParticipantId::new();

    host.negotiator.start_call(guest).await.unwrap();
    let first = host.factory.latest_for(&guest).unwrap();
    first.fail();
    host.process_transport_events().await;
    assert_eq!(host.negotiator.record_count(), 0);

    let second_id = host.negotiator.start_call(guest).await.unwrap();
    assert_ne!(first.id(), second_id);

    first.emit(TransportEventKind::StateChanged(TransportState::Failed));
    host.process_transport_events().await;

    let record = host.negotiator.record(&guest).unwrap();
    assert_eq!(record.transport_id(), second_id);
    assert_eq!(record.state(), NegotiationState::Offering);
}
