use deskshare_peer::NegotiationState;

use crate::integration::init_tracing;
use crate::utils::{MockNetwork, TestPeer, pump};

#[tokio::test]
async fn test_glare_resolves_in_favour_of_host() {
    init_tracing();
    let network = MockNetwork::new();
    let mut host = TestPeer::host(&network);
    let mut guest = TestPeer::guest(&network);

    host.negotiator.start_call(guest.id).await.unwrap();
    guest.negotiator.start_call(host.id).await.unwrap();
    pump(&mut [&mut host, &mut guest]).await;

    assert_eq!(
        host.negotiator.state_of(&guest.id),
        Some(NegotiationState::Connected)
    );
    assert_eq!(
        guest.negotiator.state_of(&host.id),
        Some(NegotiationState::Connected)
    );

    // The host kept its only transport; the guest withdrew its offer and
    // answered on a fresh one.
    assert_eq!(host.factory.created_count(), 1);
    assert_eq!(guest.factory.created_count(), 2);
    let guest_transports = guest.factory.transports();
    assert!(guest_transports[0].is_closed());
    assert!(guest_transports[1].is_linked());
    assert_eq!(
        guest.negotiator.record(&host.id).unwrap().transport_id(),
        guest_transports[1].id()
    );

    assert!(host.negotiator.record(&guest.id).unwrap().is_initiator());
    assert!(!guest.negotiator.record(&host.id).unwrap().is_initiator());
    assert_eq!(host.negotiator.connected_participants(), &[guest.id]);
    assert_eq!(guest.negotiator.connected_participants(), &[host.id]);
}
