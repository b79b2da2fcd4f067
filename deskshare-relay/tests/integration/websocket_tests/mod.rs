
use deskshare_core::{ClientSignal, RelaySignal, Role, RoomCode};

use crate::utils::WsClient;

pub async fn join(client: &mut WsClient, room: &str) -> Role {
    client
        .send(ClientSignal::Join {
            room: RoomCode::from(room),
        })
        .await
        .unwrap();

    match client.recv().await.unwrap() {
        RelaySignal::Joined { role, .. } => role,
        other => panic!("Expected Joined, got {:?}", other),
    }
}
