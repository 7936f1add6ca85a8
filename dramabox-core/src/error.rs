//! Catalog failure types.
//!
//! Every catalog operation resolves to either its data or a [`CatalogError`].
//! Callers branch on [`CatalogError::kind`] and show
//! [`CatalogError::user_message`]; the underlying relay diagnostics stay in
//! the error for logging only.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

// ============================================================================
// Failure Kind
// ============================================================================

/// The kind of failure a catalog operation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Every relay failed for the request.
    NetworkExhausted,
    /// A caller-side precondition was violated (nothing was sent).
    InvalidArgument,
    /// The episode exists but carries no usable stream URL.
    NoPlayableStream,
    /// The requested series or episode is absent from the response.
    NotFound,
}

impl FailureKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NetworkExhausted => "Network Exhausted",
            Self::InvalidArgument => "Invalid Argument",
            Self::NoPlayableStream => "No Playable Stream",
            Self::NotFound => "Not Found",
        }
    }

    /// Returns true if the UI should offer a generic retry for this kind.
    pub fn offers_retry(&self) -> bool {
        matches!(self, Self::NetworkExhausted | Self::NotFound)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Catalog Error
// ============================================================================

/// Typed failure outcome of a catalog operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// All relays failed.
    #[error("All relays failed: {last_error}")]
    NetworkExhausted {
        /// Per-relay failure descriptions, in attempt order.
        attempts: Vec<String>,
        /// The last observed relay error.
        last_error: String,
    },

    /// Caller-side precondition failed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No default quality variant and no top-level video URL.
    #[error("No playable stream for series {series_id} episode {episode_index}")]
    NoPlayableStream {
        /// Series identifier.
        series_id: String,
        /// Zero-based episode index.
        episode_index: u32,
    },

    /// Series or episode absent from the response.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl CatalogError {
    /// Returns the failure kind for UI branching.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NetworkExhausted { .. } => FailureKind::NetworkExhausted,
            Self::InvalidArgument(_) => FailureKind::InvalidArgument,
            Self::NoPlayableStream { .. } => FailureKind::NoPlayableStream,
            Self::NotFound(_) => FailureKind::NotFound,
        }
    }

    /// Returns the text shown to users for this failure.
    ///
    /// Never includes relay diagnostics or upstream error strings.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            FailureKind::NetworkExhausted | FailureKind::NotFound => {
                "Unable to load content. Please try again."
            }
            FailureKind::NoPlayableStream => {
                "Unable to play this episode. It might be locked or unavailable."
            }
            FailureKind::InvalidArgument => "Please enter something to search for.",
        }
    }

    /// Returns true if retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkExhausted { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = CatalogError::NotFound("book 42".to_string());
        assert_eq!(err.kind(), FailureKind::NotFound);

        let err = CatalogError::NoPlayableStream {
            series_id: "42".to_string(),
            episode_index: 3,
        };
        assert_eq!(err.kind(), FailureKind::NoPlayableStream);
        assert!(!err.kind().offers_retry());
    }

    #[test]
    fn test_user_message_hides_diagnostics() {
        let err = CatalogError::NetworkExhausted {
            attempts: vec!["corsproxy: HTTP 502".to_string()],
            last_error: "corsproxy: HTTP 502".to_string(),
        };
        assert!(!err.user_message().contains("502"));
        assert!(err.kind().offers_retry());
        assert!(err.is_transient());
    }

    #[test]
    fn test_failure_kind_serde() {
        let json = serde_json::to_string(&FailureKind::NoPlayableStream).unwrap();
        assert_eq!(json, r#""no_playable_stream""#);
    }
}
