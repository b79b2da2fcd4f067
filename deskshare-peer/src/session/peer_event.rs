use deskshare_core::ParticipantId;
use std::sync::Arc;
use webrtc::track::track_remote::TrackRemote;

/// Notifications for the application layered on top of a session.
pub enum PeerEvent {
    /// Negotiation with the participant completed.
    ParticipantConnected(ParticipantId),
    ParticipantDisconnected(ParticipantId),
    /// A media track sent by the participant.
    RemoteTrack {
        participant: ParticipantId,
        track: Arc<TrackRemote>,
    },
}
