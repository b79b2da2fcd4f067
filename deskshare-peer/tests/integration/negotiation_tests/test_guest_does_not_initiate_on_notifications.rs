use deskshare_core::{ParticipantId, RelaySignal};

use crate::integration::init_tracing;
use crate::utils::{MockNetwork, TestPeer};

#[tokio::test]
async fn test_guest_does_not_initiate_on_notifications() {
    init_tracing();
    let network = MockNetwork::new();
    let mut guest = TestPeer::guest(&network);
    let other = ParticipantId::new();

    guest
        .negotiator
        .handle_signal(RelaySignal::ParticipantJoined {
            participant_id: other,
        })
        .await;
    guest
        .negotiator
        .handle_signal(RelaySignal::ConnectionRequested { from: other })
        .await;

    assert_eq!(guest.negotiator.record_count(), 0);
    assert!(guest.relay.history().is_empty());
}
