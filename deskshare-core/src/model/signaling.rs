use crate::error::ProtocolError;
use crate::model::participant::{ParticipantId, Role};
use crate::model::room::RoomCode;
use crate::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2, DEFAULT_STUN_ADDR_3, DEFAULT_STUN_ADDR_4};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Opaque body of offer/answer/candidate messages. The relay forwards it verbatim.
pub type SignalPayload = serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn default_stun() -> Vec<Self> {
        vec![Self {
            urls: vec![
                DEFAULT_STUN_ADDR.to_owned(),
                DEFAULT_STUN_ADDR_2.to_owned(),
                DEFAULT_STUN_ADDR_3.to_owned(),
                DEFAULT_STUN_ADDR_4.to_owned(),
            ],
            username: None,
            credential: None,
        }]
    }
}

/// Messages a participant sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ClientSignal {
    Join {
        room: RoomCode,
    },
    RequestConnection {
        room: RoomCode,
    },
    Offer {
        room: RoomCode,
        target: ParticipantId,
        payload: SignalPayload,
    },
    Answer {
        room: RoomCode,
        target: ParticipantId,
        payload: SignalPayload,
    },
    IceCandidate {
        room: RoomCode,
        target: ParticipantId,
        payload: SignalPayload,
    },
}

/// Messages the relay delivers to a participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum RelaySignal {
    Welcome {
        participant_id: ParticipantId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    Joined {
        room: RoomCode,
        role: Role,
    },
    ParticipantJoined {
        participant_id: ParticipantId,
    },
    ConnectionRequested {
        from: ParticipantId,
    },
    Offer {
        from: ParticipantId,
        payload: SignalPayload,
    },
    Answer {
        from: ParticipantId,
        payload: SignalPayload,
    },
    IceCandidate {
        from: ParticipantId,
        payload: SignalPayload,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Session description in the shape browsers exchange (`{type, sdp}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }

    pub fn to_payload(&self) -> Result<SignalPayload, ProtocolError> {
        to_payload(self)
    }

    pub fn from_payload(payload: SignalPayload) -> Result<Self, ProtocolError> {
        from_payload(payload)
    }
}

/// Connectivity candidate, serialized like `RTCIceCandidateInit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default, rename = "sdpMLineIndex")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default)]
    pub username_fragment: Option<String>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
            username_fragment: None,
        }
    }

    pub fn to_payload(&self) -> Result<SignalPayload, ProtocolError> {
        to_payload(self)
    }

    pub fn from_payload(payload: SignalPayload) -> Result<Self, ProtocolError> {
        from_payload(payload)
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<SignalPayload, ProtocolError> {
    Ok(serde_json::to_value(value)?)
}

fn from_payload<T: DeserializeOwned>(payload: SignalPayload) -> Result<T, ProtocolError> {
    Ok(serde_json::from_value(payload)?)
}
