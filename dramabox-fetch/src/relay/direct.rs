//! Direct relays (corsproxy / codetabs style).
//!
//! These relays echo the upstream response as their own body. When the
//! upstream or the relay fails they usually answer with an HTML error page,
//! so the body is always read as text and only then decoded.

use async_trait::async_trait;
use serde_json::Value;

use super::encode_target;
use crate::error::RelayError;
use crate::strategy::{RelayKind, RelayStrategy};
use crate::validator::validate_payload;

/// Relay that passes the upstream body through unchanged.
#[derive(Debug, Clone)]
pub struct DirectRelay {
    id: String,
    endpoint: String,
    secondary: bool,
}

impl DirectRelay {
    /// Creates a primary direct relay.
    pub fn new(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            endpoint: endpoint.into(),
            secondary: false,
        }
    }

    /// Creates a last-resort direct relay.
    pub fn secondary(id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            secondary: true,
            ..Self::new(id, endpoint)
        }
    }
}

#[async_trait]
impl RelayStrategy for DirectRelay {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> RelayKind {
        if self.secondary {
            RelayKind::SecondaryDirect
        } else {
            RelayKind::Direct
        }
    }

    fn relay_url(&self, target_url: &str) -> String {
        format!("{}{}", self.endpoint, encode_target(target_url))
    }

    fn unwrap_body(&self, body: &str) -> Result<Value, RelayError> {
        decode_direct_body(body)
    }
}

/// Decodes a pass-through relay body into the validated payload.
pub fn decode_direct_body(body: &str) -> Result<Value, RelayError> {
    let trimmed = body.trim_start();
    if trimmed.is_empty() {
        return Err(RelayError::Decode("empty body".to_string()));
    }
    if trimmed.starts_with('<') {
        return Err(RelayError::Decode("relay returned an HTML page".to_string()));
    }

    let payload: Value =
        serde_json::from_str(trimmed).map_err(|e| RelayError::Decode(e.to_string()))?;

    validate_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_envelope() {
        let payload = decode_direct_body(r#"{"success":true,"data":{"list":[]}}"#).unwrap();
        assert!(payload.get("data").is_some());
    }

    #[test]
    fn test_decodes_bare_array() {
        let payload = decode_direct_body(r#" [{"bookId":"1"}]"#).unwrap();
        assert!(payload.is_array());
    }

    #[test]
    fn test_html_page_is_decode_error() {
        let err = decode_direct_body("<html><body>Too many requests</body></html>").unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode_direct_body("{not json"), Err(RelayError::Decode(_))));
        assert!(matches!(decode_direct_body("   "), Err(RelayError::Decode(_))));
    }

    #[test]
    fn test_null_is_envelope_invalid() {
        assert!(matches!(
            decode_direct_body("null"),
            Err(RelayError::EnvelopeInvalid)
        ));
    }

    #[test]
    fn test_secondary_kind() {
        let relay = DirectRelay::secondary("codetabs", "https://api.codetabs.com/v1/proxy?quest=");
        assert_eq!(relay.kind(), RelayKind::SecondaryDirect);
        assert!(relay.relay_url("https://x/y").starts_with("https://api.codetabs.com/v1/proxy?quest=https%3A"));
    }
}
