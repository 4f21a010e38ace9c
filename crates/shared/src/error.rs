use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown direction '{0}'")]
    UnknownDirection(String),
    #[error("invalid JSON frame: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("unsupported message type {message_type:?}: {reason}")]
    UnsupportedMessage {
        message_type: Option<String>,
        reason: String,
    },
    #[error("invalid pairing payload: {0}")]
    InvalidPairing(String),
    #[error("failed to serialize frame: {0}")]
    Serialize(#[source] serde_json::Error),
}
