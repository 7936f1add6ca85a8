//! Response envelope validation.
//!
//! The check is intentionally loose: it accepts old-style `{success: true}`
//! envelopes and new-style "has a `data` field" responses, and rejects only
//! payloads that are clearly not API responses (HTML error pages that were
//! coerced into JSON, empty objects, `null`).

use serde_json::Value;

use crate::error::RelayError;

/// Returns true iff `payload` is an object with `success == true` or a
/// `data` field (a `null` data still counts as present).
pub fn is_valid_envelope(payload: &Value) -> bool {
    let Some(object) = payload.as_object() else {
        return false;
    };

    object.get("success") == Some(&Value::Bool(true)) || object.contains_key("data")
}

/// Returns true for a valid envelope or a bare array listing.
///
/// The query-string upstream answers listings with a bare array, which must
/// survive relay validation.
pub fn is_valid_payload(payload: &Value) -> bool {
    payload.is_array() || is_valid_envelope(payload)
}

/// Passes `payload` through if [`is_valid_payload`] accepts it.
pub fn validate_payload(payload: Value) -> Result<Value, RelayError> {
    if is_valid_payload(&payload) {
        Ok(payload)
    } else {
        Err(RelayError::EnvelopeInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_acceptance() {
        assert!(is_valid_envelope(&json!({"success": true})));
        assert!(is_valid_envelope(&json!({"data": {"list": []}})));
        assert!(is_valid_envelope(&json!({"success": false, "data": null})));
    }

    #[test]
    fn test_envelope_rejection() {
        assert!(!is_valid_envelope(&Value::Null));
        assert!(!is_valid_envelope(&json!({})));
        assert!(!is_valid_envelope(&json!({"success": false})));
        assert!(!is_valid_envelope(&json!({"success": "true"})));
        assert!(!is_valid_envelope(&json!("<html>502 Bad Gateway</html>")));
        assert!(!is_valid_envelope(&json!([1, 2])));
    }

    #[test]
    fn test_payload_accepts_bare_arrays() {
        assert!(is_valid_payload(&json!([])));
        assert!(is_valid_payload(&json!([{"bookId": "1"}])));
        assert!(!is_valid_payload(&json!(42)));
        assert!(matches!(
            validate_payload(json!({})),
            Err(RelayError::EnvelopeInvalid)
        ));
    }
}
