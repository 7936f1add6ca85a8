//! Fetch context shared by all relay strategies.
//!
//! The context is built once at startup and handed to the fallback fetcher;
//! strategies only read from it.

use std::sync::Arc;
use std::time::Duration;

use crate::http::{DEFAULT_TIMEOUT_SECS, HttpClient, USER_AGENT};
use crate::strategy::RelaySpec;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for relay requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Timeout for a single relay request.
    pub timeout: Duration,
    /// User agent sent to relays.
    pub user_agent: String,
    /// Whether to refuse hosts other than the configured relays.
    pub restrict_to_relays: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            restrict_to_relays: true,
        }
    }
}

impl FetchSettings {
    /// Creates settings with custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to relay strategies.
pub struct FetchContext {
    /// HTTP client with tracing.
    pub http: Arc<HttpClient>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a new fetch context with default settings.
    pub fn new() -> Self {
        Self::with_settings(FetchSettings::default())
    }

    /// Creates a context with custom settings and an unrestricted client.
    pub fn with_settings(settings: FetchSettings) -> Self {
        let http = HttpClient::with_timeout(settings.timeout, &settings.user_agent);
        Self {
            http: Arc::new(http),
            settings,
        }
    }

    /// Creates a context whose client may only contact the given relays
    /// (when `restrict_to_relays` is set).
    pub fn for_relays(relays: &[RelaySpec], settings: FetchSettings) -> Self {
        let mut http = HttpClient::with_timeout(settings.timeout, &settings.user_agent);
        if settings.restrict_to_relays {
            let hosts: Vec<String> = relays.iter().filter_map(RelaySpec::host).collect();
            http = http.restrict_to(hosts);
        }
        Self {
            http: Arc::new(http),
            settings,
        }
    }

    /// Returns the effective timeout for relay requests.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
