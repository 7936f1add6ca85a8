//! Relay strategy trait and types.
//!
//! A strategy is one way of reaching the upstream API: through a specific
//! public CORS relay, with that relay's own response convention. The fallback
//! fetcher tries strategies in their configured order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;
use url::Url;

use crate::context::FetchContext;
use crate::error::RelayError;
use crate::http::ResponseExt;

// ============================================================================
// Relay Kind
// ============================================================================

/// The response convention a relay uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayKind {
    /// Relay wraps the upstream body as text under `contents`.
    Wrapped,
    /// Relay echoes the upstream body verbatim.
    Direct,
    /// Same as [`RelayKind::Direct`], kept as a last resort.
    SecondaryDirect,
}

impl RelayKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Wrapped => "Wrapped",
            Self::Direct => "Direct",
            Self::SecondaryDirect => "Secondary Direct",
        }
    }
}

impl fmt::Display for RelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Relay Response
// ============================================================================

/// A validated upstream payload and the relay that delivered it.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    /// The upstream payload.
    pub payload: Value,
    /// The strategy that succeeded.
    pub strategy_id: String,
}

impl RelayResponse {
    /// Creates a new relay response.
    pub fn new(payload: Value, strategy_id: impl Into<String>) -> Self {
        Self {
            payload,
            strategy_id: strategy_id.into(),
        }
    }
}

// ============================================================================
// Relay Strategy Trait
// ============================================================================

/// A strategy for reaching the upstream API through one relay.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct MyRelay;
///
/// #[async_trait]
/// impl RelayStrategy for MyRelay {
///     fn id(&self) -> &str { "myrelay" }
///     fn kind(&self) -> RelayKind { RelayKind::Direct }
///     fn relay_url(&self, target_url: &str) -> String {
///         format!("https://relay.example/?u={}", encode_target(target_url))
///     }
///     fn unwrap_body(&self, body: &str) -> Result<Value, RelayError> {
///         decode_direct_body(body)
///     }
/// }
/// ```
#[async_trait]
pub trait RelayStrategy: Send + Sync {
    /// Unique identifier for this relay (e.g. "corsproxy").
    fn id(&self) -> &str;

    /// The response convention this relay uses.
    fn kind(&self) -> RelayKind;

    /// Human-readable name for this strategy.
    fn display_name(&self) -> String {
        format!("{} ({})", self.id(), self.kind().display_name())
    }

    /// Builds the relay request URL for an upstream target URL.
    fn relay_url(&self, target_url: &str) -> String;

    /// Turns the relay's response body into the validated upstream payload.
    fn unwrap_body(&self, body: &str) -> Result<Value, RelayError>;

    /// Fetches `target_url` through this relay.
    ///
    /// The default implementation performs a GET against
    /// [`RelayStrategy::relay_url`], rejects non-2xx statuses, reads the body
    /// as text and hands it to [`RelayStrategy::unwrap_body`].
    async fn fetch_raw(&self, ctx: &FetchContext, target_url: &str) -> Result<Value, RelayError> {
        let url = self.relay_url(target_url);
        let response = ctx.http.get(&url).await?;

        if response.is_rate_limited() {
            warn!(
                relay = %self.id(),
                retry_after = ?response.retry_after_secs(),
                "Relay is rate limiting"
            );
        }

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        self.unwrap_body(&body)
    }
}

// ============================================================================
// Relay Spec
// ============================================================================

/// Declarative description of a relay, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySpec {
    /// Strategy identifier.
    pub id: String,
    /// Response convention.
    pub kind: RelayKind,
    /// Endpoint prefix; the percent-encoded target URL is appended.
    pub endpoint: String,
}

impl RelaySpec {
    /// Creates a relay spec.
    pub fn new(id: impl Into<String>, kind: RelayKind, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            endpoint: endpoint.into(),
        }
    }

    /// The default relay chain, most reliable first.
    pub fn defaults() -> Vec<RelaySpec> {
        vec![
            Self::new(
                "allorigins",
                RelayKind::Wrapped,
                "https://api.allorigins.win/get?url=",
            ),
            Self::new("corsproxy", RelayKind::Direct, "https://corsproxy.io/?url="),
            Self::new(
                "codetabs",
                RelayKind::SecondaryDirect,
                "https://api.codetabs.com/v1/proxy?quest=",
            ),
        ]
    }

    /// Returns the relay host, if the endpoint is a valid URL.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    /// Builds the strategy described by this spec.
    pub fn build(&self) -> Box<dyn RelayStrategy> {
        crate::relay::build_relay(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_kind_display() {
        assert_eq!(RelayKind::Wrapped.display_name(), "Wrapped");
        assert_eq!(RelayKind::SecondaryDirect.to_string(), "Secondary Direct");
    }

    #[test]
    fn test_default_order() {
        let ids: Vec<String> = RelaySpec::defaults().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["allorigins", "corsproxy", "codetabs"]);
    }

    #[test]
    fn test_spec_host() {
        let spec = RelaySpec::new("x", RelayKind::Direct, "https://corsproxy.io/?url=");
        assert_eq!(spec.host().as_deref(), Some("corsproxy.io"));

        let bad = RelaySpec::new("x", RelayKind::Direct, "not a url");
        assert!(bad.host().is_none());
    }

    #[test]
    fn test_spec_serde() {
        let json = r#"{"id":"corsproxy","kind":"secondary_direct","endpoint":"https://c/?u="}"#;
        let spec: RelaySpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.kind, RelayKind::SecondaryDirect);
        assert_eq!(spec.build().id(), "corsproxy");
    }
}
