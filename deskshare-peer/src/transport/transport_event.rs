use crate::transport::InputChannel;
use bytes::Bytes;
use deskshare_core::{IceCandidate, ParticipantId};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use webrtc::track::track_remote::TrackRemote;

static NEXT_TRANSPORT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one transport instance. A record that replaces its transport
/// gets a new id, so late events from the old one can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportId(u64);

impl TransportId {
    pub fn next() -> Self {
        Self(NEXT_TRANSPORT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TransportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport#{}", self.0)
    }
}

/// Connectivity state as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl TransportState {
    /// States that end the remote connection record.
    pub fn is_lost(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Failed)
    }
}

/// Offer/answer sub-state of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalingState {
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

/// Something a transport or its input channel reported.
pub enum TransportEventKind {
    StateChanged(TransportState),
    /// A local candidate to trickle to the remote side.
    CandidateGathered(IceCandidate),
    ChannelOpen(Arc<dyn InputChannel>),
    ChannelMessage(Bytes),
    ChannelClosed,
    ChannelError(String),
    RemoteTrack(Arc<TrackRemote>),
}

impl fmt::Debug for TransportEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateChanged(s) => f.debug_tuple("StateChanged").field(s).finish(),
            Self::CandidateGathered(c) => f.debug_tuple("CandidateGathered").field(c).finish(),
            Self::ChannelOpen(ch) => f.debug_tuple("ChannelOpen").field(&ch.label()).finish(),
            Self::ChannelMessage(data) => write!(f, "ChannelMessage({} bytes)", data.len()),
            Self::ChannelClosed => f.write_str("ChannelClosed"),
            Self::ChannelError(e) => f.debug_tuple("ChannelError").field(e).finish(),
            Self::RemoteTrack(track) => f.debug_tuple("RemoteTrack").field(&track.id()).finish(),
        }
    }
}

/// Event tagged with the remote participant and the transport that produced it.
#[derive(Debug)]
pub struct TransportEvent {
    pub remote: ParticipantId,
    pub transport: TransportId,
    pub kind: TransportEventKind,
}

/// Handle given to a transport for reporting events back to the negotiator.
#[derive(Clone)]
pub struct EventSink {
    remote: ParticipantId,
    transport: TransportId,
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl EventSink {
    pub fn new(
        remote: ParticipantId,
        transport: TransportId,
        tx: mpsc::UnboundedSender<TransportEvent>,
    ) -> Self {
        Self {
            remote,
            transport,
            tx,
        }
    }

    pub fn remote(&self) -> ParticipantId {
        self.remote
    }

    pub fn transport(&self) -> TransportId {
        self.transport
    }

    /// Returns false once the negotiator is gone.
    pub fn emit(&self, kind: TransportEventKind) -> bool {
        self.tx
            .send(TransportEvent {
                remote: self.remote,
                transport: self.transport,
                kind,
            })
            .is_ok()
    }
}
