use deskshare_core::{ClientSignal, ParticipantId, RelaySignal, RoomCode};
use deskshare_relay::RelayCommand;
use serde_json::json;

use crate::integration::hub_tests::join;
use crate::integration::{create_test_hub, init_tracing};

#[tokio::test]
async fn test_offer_answer_and_candidate_are_forwarded_verbatim_with_sender() {
    init_tracing();
    let (mut hub, signaling) = create_test_hub();
    let host = ParticipantId::new();
    let guest = ParticipantId::new();
    let room = RoomCode::from("482913");

    hub.handle_command(join(host, "482913")).await;
    hub.handle_command(join(guest, "482913")).await;
    signaling.clear().await;

    let offer = json!({"type": "offer", "sdp": "v=0\r\nopaque"});
    let answer = json!({"type": "answer", "sdp": "v=0\r\nopaque too"});
    let candidate = json!({"candidate": "candidate:1", "extra": [1, 2, 3]});

    hub.handle_command(RelayCommand::Signal {
        from: host,
        signal: ClientSignal::Offer {
            room: room.clone(),
            target: guest,
            payload: offer.clone(),
        },
    })
    .await;
    hub.handle_command(RelayCommand::Signal {
        from: guest,
        signal: ClientSignal::Answer {
            room: room.clone(),
            target: host,
            payload: answer.clone(),
        },
    })
    .await;
    hub.handle_command(RelayCommand::Signal {
        from: guest,
        signal: ClientSignal::IceCandidate {
            room: room.clone(),
            target: host,
            payload: candidate.clone(),
        },
    })
    .await;

    assert_eq!(
        signaling.signals_for(&guest).await,
        vec![RelaySignal::Offer {
            from: host,
            payload: offer,
        }]
    );
    assert_eq!(
        signaling.signals_for(&host).await,
        vec![
            RelaySignal::Answer {
                from: guest,
                payload: answer,
            },
            RelaySignal::IceCandidate {
                from: guest,
                payload: candidate,
            },
        ]
    );
}
