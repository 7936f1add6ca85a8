//! Fetch error types.

use std::fmt;
use thiserror::Error;

use crate::pipeline::FetchAttempt;

// ============================================================================
// Relay Error
// ============================================================================

/// Broad classification of a relay failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayErrorKind {
    /// Relay unreachable or answered with a non-2xx status.
    Transport,
    /// Body was not JSON, or the wrapper carried no usable content.
    Decode,
    /// Body decoded but does not look like an API response.
    EnvelopeInvalid,
}

impl fmt::Display for RelayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Decode => write!(f, "decode"),
            Self::EnvelopeInvalid => write!(f, "envelope"),
        }
    }
}

/// Error raised by a single relay strategy.
///
/// These never cross the fallback fetcher boundary on their own; they are
/// recorded per attempt and the last one is carried by
/// [`FetchError::Exhausted`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    /// Connection, TLS, timeout or allowlist failure.
    #[error("Relay unreachable: {0}")]
    Transport(String),

    /// Relay answered with a non-success status.
    #[error("Relay returned HTTP {0}")]
    HttpStatus(u16),

    /// Relay body could not be decoded as JSON.
    #[error("Relay returned non-JSON: {0}")]
    Decode(String),

    /// Wrapped relay response had no `contents`.
    #[error("Relay wrapper has no contents")]
    MissingContents,

    /// Decoded payload failed envelope validation.
    #[error("Payload is not a valid API response")]
    EnvelopeInvalid,
}

impl RelayError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> RelayErrorKind {
        match self {
            Self::Transport(_) | Self::HttpStatus(_) => RelayErrorKind::Transport,
            Self::Decode(_) | Self::MissingContents => RelayErrorKind::Decode,
            Self::EnvelopeInvalid => RelayErrorKind::EnvelopeInvalid,
        }
    }
}

impl From<HttpError> for RelayError {
    fn from(err: HttpError) -> Self {
        RelayError::Transport(err.to_string())
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Transport(err.to_string())
    }
}

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for a whole fallback fetch.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The fetcher has no relays to try.
    #[error("No relay strategies configured")]
    NoStrategies,

    /// Every relay failed.
    #[error("All relays failed, last error: {last}")]
    Exhausted {
        /// The last observed relay error.
        last: RelayError,
        /// Every attempt, in order.
        attempts: Vec<FetchAttempt>,
    },
}

impl FetchError {
    /// Returns one `"{strategy}: {error}"` line per failed attempt.
    pub fn attempt_errors(&self) -> Vec<String> {
        match self {
            Self::NoStrategies => Vec::new(),
            Self::Exhausted { attempts, .. } => attempts
                .iter()
                .filter_map(|a| {
                    a.error
                        .as_ref()
                        .map(|e| format!("{}: {}", a.strategy_id, e))
                })
                .collect(),
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_error_kinds() {
        assert_eq!(RelayError::HttpStatus(502).kind(), RelayErrorKind::Transport);
        assert_eq!(RelayError::MissingContents.kind(), RelayErrorKind::Decode);
        assert_eq!(
            RelayError::EnvelopeInvalid.kind(),
            RelayErrorKind::EnvelopeInvalid
        );
    }

    #[test]
    fn test_http_error_becomes_transport() {
        let err: RelayError = HttpError::DomainNotAllowed("evil.com".to_string()).into();
        assert_eq!(err.kind(), RelayErrorKind::Transport);
        assert!(err.to_string().contains("evil.com"));
    }
}
