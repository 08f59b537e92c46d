//! Response envelope classification.
//!
//! The gateway answers most failures with HTTP 200 and a body such as
//! `{"status":"error","err_description":"..."}`, so the status code alone says
//! little. Every decoded body goes through [`classify`] before it is turned
//! into a typed result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{MISSING_ERROR_DESCRIPTION, NO_RESPONSE};
use crate::error::LiqPayError;

/// A decoded response body, before it is known to be a success.
pub type ResponseEnvelope = Map<String, Value>;

/// Outcome of inspecting a response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Success,
    Failure { message: String },
}

impl Classification {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn into_result(self) -> Result<(), LiqPayError> {
        match self {
            Self::Success => Ok(()),
            Self::Failure { message } => Err(LiqPayError::Gateway { message }),
        }
    }
}

/// Classify a response envelope.
///
/// Success requires a `status` field whose value is anything other than the
/// string `"error"`. A missing envelope or a missing `status` is a failure.
pub fn classify(envelope: Option<&ResponseEnvelope>) -> Classification {
    let Some(envelope) = envelope else {
        return Classification::Failure {
            message: NO_RESPONSE.to_string(),
        };
    };
    match envelope.get("status") {
        Some(status) if status.as_str() != Some("error") => Classification::Success,
        _ => Classification::Failure {
            message: error_description(envelope),
        },
    }
}

fn error_description(envelope: &ResponseEnvelope) -> String {
    envelope
        .get("err_description")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| MISSING_ERROR_DESCRIPTION.to_string())
}

/// Body of a non-2xx HTTP response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub err_description: Option<String>,
}

impl ErrorBody {
    /// The gateway's description, or the fixed fallback when it is absent,
    /// `null` or empty.
    pub fn into_error(self) -> LiqPayError {
        match self.err_description {
            Some(message) if !message.is_empty() => LiqPayError::gateway(message),
            _ => LiqPayError::gateway(MISSING_ERROR_DESCRIPTION),
        }
    }
}
