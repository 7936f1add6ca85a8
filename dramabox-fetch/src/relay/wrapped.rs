//! Wrapped relay (allorigins-style).
//!
//! The relay answers with its own JSON object whose `contents` field holds
//! the upstream body as a string, which must be decoded a second time.

use async_trait::async_trait;
use serde_json::Value;

use super::encode_target;
use crate::error::RelayError;
use crate::strategy::{RelayKind, RelayStrategy};
use crate::validator::validate_payload;

/// Relay that wraps the upstream body under `contents`.
#[derive(Debug, Clone)]
pub struct WrappedRelay {
    id: String,
    endpoint: String,
}

impl WrappedRelay {
    /// Creates a wrapped relay.
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RelayStrategy for WrappedRelay {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> RelayKind {
        RelayKind::Wrapped
    }

    fn relay_url(&self, target_url: &str) -> String {
        format!("{}{}", self.endpoint, encode_target(target_url))
    }

    fn unwrap_body(&self, body: &str) -> Result<Value, RelayError> {
        decode_wrapped_body(body)
    }
}

/// Decodes a `{"contents": "..."}` relay body into the validated payload.
pub fn decode_wrapped_body(body: &str) -> Result<Value, RelayError> {
    let wrapper: Value = serde_json::from_str(body)
        .map_err(|e| RelayError::Decode(format!("relay wrapper: {e}")))?;

    let contents = wrapper
        .get("contents")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(RelayError::MissingContents)?;

    let payload: Value = serde_json::from_str(contents)
        .map_err(|e| RelayError::Decode(format!("wrapped contents: {e}")))?;

    validate_payload(payload)
}
