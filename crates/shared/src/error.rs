use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::category::ErrorShape;

/// A failed request as carried by a `*_FAILED` action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    /// HTTP status, or 0 when the request never produced a response.
    pub status: u16,
    pub message: String,
    /// Raw response body; `Value::Null` for transport failures.
    #[serde(default)]
    pub body: Value,
}

impl Failure {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: Value::Null,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Builds a failure from an error response. The message comes from the
    /// body's `message` field, falling back to `fallback`.
    pub fn from_response(status: u16, body: Value, fallback: &str) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        Self {
            status,
            message,
            body,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

/// Value held by one error-slice key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorEntry {
    Status { status: u16, message: String },
    RawBody(Value),
}

impl ErrorEntry {
    /// Shapes `failure` the way the category's table entry asks for. Returns
    /// `None` for categories that are reported rather than recorded.
    pub fn for_shape(shape: ErrorShape, failure: &Failure) -> Option<Self> {
        match shape {
            ErrorShape::StatusMessage => Some(ErrorEntry::Status {
                status: failure.status,
                message: failure.message.clone(),
            }),
            ErrorShape::RawBody => Some(ErrorEntry::RawBody(failure.body.clone())),
            ErrorShape::Reported => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("expected a JSON array of objects")]
    NotAnArray,
    #[error("malformed page: {0}")]
    Page(#[from] serde_json::Error),
}
