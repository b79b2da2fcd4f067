
use deskshare_core::ParticipantId;
use deskshare_peer::{NegotiationState, TransportState};

use crate::utils::{MockNetwork, Outbound, TestPeer};

#[derive(Debug, Clone, Copy)]
pub enum HostCandidate {
    BeforeOffer,
    AfterOffer,
    AfterAnswer,
}

#[derive(Debug, Clone, Copy)]
pub enum GuestCandidate {
    BeforeAnswer,
    AfterAnswer,
}

pub fn pick(messages: &[Outbound], pred: fn(&Outbound) -> bool) -> Outbound {
    messages
        .iter()
        .find(|m| pred(m))
        .cloned()
        .expect("Expected message was not sent")
}

pub async fn deliver(to: &mut TestPeer, from: ParticipantId, message: &Outbound) {
    to.negotiator.handle_signal(message.deliver_as(from)).await;
}

pub async fn run_ordering(c1: HostCandidate, c2: GuestCandidate) {
    let network = MockNetwork::new();
    let mut host = TestPeer::host(&network);
    let mut guest = TestPeer::guest(&network);

    host.negotiator.start_call(guest.id).await.unwrap();
    let from_host = host.flush().await;
    let offer = pick(&from_host, Outbound::is_offer);
    let host_candidate = pick(&from_host, Outbound::is_ice);

    if let HostCandidate::BeforeOffer = c1 {
        deliver(&mut guest, host.id, &host_candidate).await;
        assert_eq!(guest.negotiator.pending_candidates(&host.id), 1);
        assert!(guest.negotiator.record(&host.id).is_none());
    }
    deliver(&mut guest, host.id, &offer).await;
    assert_eq!(guest.negotiator.pending_candidates(&host.id), 0);
    if let HostCandidate::AfterOffer = c1 {
        deliver(&mut guest, host.id, &host_candidate).await;
    }

    let from_guest = guest.flush().await;
    let answer = pick(&from_guest, Outbound::is_answer);
    let guest_candidate = pick(&from_guest, Outbound::is_ice);

    if let GuestCandidate::BeforeAnswer = c2 {
        deliver(&mut host, guest.id, &guest_candidate).await;
        assert_eq!(host.negotiator.pending_candidates(&guest.id), 1);
    }
    deliver(&mut host, guest.id, &answer).await;
    assert_eq!(host.negotiator.pending_candidates(&guest.id), 0);
    if let GuestCandidate::AfterAnswer = c2 {
        deliver(&mut host, guest.id, &guest_candidate).await;
    }

    if let HostCandidate::AfterAnswer = c1 {
        deliver(&mut guest, host.id, &host_candidate).await;
    }

    host.process_transport_events().await;
    guest.process_transport_events().await;

    for (peer, remote) in [(&host, &guest), (&guest, &host)] {
        let record = peer
            .negotiator
            .record(&remote.id)
            .unwrap_or_else(|| panic!("{c1:?}/{c2:?}: record missing"));
        assert_eq!(
            record.state(),
            NegotiationState::Connected,
            "{c1:?}/{c2:?}"
        );
        assert_eq!(
            record.transport_state(),
            TransportState::Connected,
            "{c1:?}/{c2:?}"
        );
        assert_eq!(peer.negotiator.pending_candidates(&remote.id), 0);
    }
}
