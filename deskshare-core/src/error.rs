use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("pointer coordinates out of range: ({x}, {y})")]
    CoordinatesOutOfRange { x: f64, y: f64 },

    #[error("input packet codec failure: {0}")]
    Codec(#[from] postcard::Error),

    #[error("malformed signaling payload: {0}")]
    Payload(#[from] serde_json::Error),
}
