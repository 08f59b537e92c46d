use thiserror::Error;

use crate::constants::UNKNOWN_ORDER_ID;

/// Errors returned by LiqPay operations.
#[derive(Debug, Error)]
pub enum LiqPayError {
    #[error("public key has bad format: {0}")]
    MalformedKey(String),

    #[error("time must be in RFC3339 or timestamp format: {0}")]
    UnsupportedTimeFormat(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{message}")]
    Gateway { message: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("callback signature does not match payload")]
    InvalidSignature,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("config error: {0}")]
    Config(String),
}

impl LiqPayError {
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
        }
    }

    /// True for the gateway failure reported when a status lookup names an
    /// order the gateway has never seen.
    pub fn is_unknown_order(&self) -> bool {
        matches!(self, Self::Gateway { message } if message == UNKNOWN_ORDER_ID)
    }
}
