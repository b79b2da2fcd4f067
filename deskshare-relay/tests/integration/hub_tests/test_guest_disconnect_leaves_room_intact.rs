use deskshare_core::{ParticipantId, RoomCode};
use deskshare_relay::RelayCommand;

use crate::integration::hub_tests::join;
use crate::integration::{create_test_hub, init_tracing};

#[tokio::test]
async fn test_guest_disconnect_leaves_room_intact() {
    init_tracing();
    let (mut hub, _signaling) = create_test_hub();
    let host = ParticipantId::new();
    let guest = ParticipantId::new();
    let room = RoomCode::from("7");

    hub.handle_command(join(host, "7")).await;
    hub.handle_command(join(guest, "7")).await;
    hub.handle_command(RelayCommand::Disconnect { participant: guest })
        .await;

    assert_eq!(hub.registry().host_of(&room), Some(host));
    assert_eq!(hub.registry().room(&room).map(|r| r.len()), Some(1));
}
