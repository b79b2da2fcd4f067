use crate::error::ProtocolError;
use crate::model::participant::ParticipantId;
use crate::utils::{POINTER_MAX, POINTER_MIN};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind-specific part of an input event. Pointer coordinates are percentages of
/// the shared surface and must lie in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputKind {
    PointerMove { x: f64, y: f64 },
    PointerDown { x: f64, y: f64, button: u8 },
    PointerUp { x: f64, y: f64, button: u8 },
    Click { x: f64, y: f64, button: u8 },
    KeyDown { key: String, code: String },
    KeyUp { key: String, code: String },
    Wheel { delta_x: f64, delta_y: f64 },
}

/// A remote-control event as carried on the input channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Milliseconds since the Unix epoch on the originating side.
    pub timestamp: u64,
    pub kind: InputKind,
}

/// An input event delivered to the local application, tagged with its sender.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedInput {
    pub sender_id: ParticipantId,
    pub event: InputEvent,
}

impl InputEvent {
    /// Stamp `kind` with the current wall-clock time.
    pub fn new(kind: InputKind) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self { timestamp, kind }
    }

    pub fn at(timestamp: u64, kind: InputKind) -> Self {
        Self { timestamp, kind }
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            InputKind::PointerMove { .. } => "pointer-move",
            InputKind::PointerDown { .. } => "pointer-down",
            InputKind::PointerUp { .. } => "pointer-up",
            InputKind::Click { .. } => "click",
            InputKind::KeyDown { .. } => "key-down",
            InputKind::KeyUp { .. } => "key-up",
            InputKind::Wheel { .. } => "wheel",
        }
    }

    pub fn pointer_position(&self) -> Option<(f64, f64)> {
        match self.kind {
            InputKind::PointerMove { x, y }
            | InputKind::PointerDown { x, y, .. }
            | InputKind::PointerUp { x, y, .. }
            | InputKind::Click { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    /// NaN coordinates fail this check as well.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let Some((x, y)) = self.pointer_position() else {
            return Ok(());
        };
        let range = POINTER_MIN..=POINTER_MAX;
        if range.contains(&x) && range.contains(&y) {
            Ok(())
        } else {
            Err(ProtocolError::CoordinatesOutOfRange { x, y })
        }
    }

    pub fn encode(&self) -> Result<Bytes, ProtocolError> {
        self.validate()?;
        Ok(Bytes::from(postcard::to_allocvec(self)?))
    }

    /// Decode a channel frame. Coordinates received from the network are checked again.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        let event: InputEvent = postcard::from_bytes(data)?;
        event.validate()?;
        Ok(event)
    }
}
