//! Client configuration.
//!
//! Stored as JSON at `<config_dir>/dramabox/config.json`. Every field has a
//! default, so a missing file or a partial file are both valid.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dramabox_catalog::{
    CatalogApi, CatalogApiBuilder, DEFAULT_BASE_URL, NormalizeOptions, SchemeKind, TagMergePolicy,
};
use dramabox_fetch::{FetchSettings, RelaySpec, RetryPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};
use crate::search::SkipAheadPolicy;

// ============================================================================
// Sections
// ============================================================================

/// Upstream API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Upstream base URL.
    pub base_url: String,
    /// Endpoint convention of the upstream deployment.
    pub scheme: SchemeKind,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            scheme: SchemeKind::default(),
        }
    }
}

/// Network settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Timeout for one relay request, in seconds.
    pub timeout_secs: u64,
    /// Attempts per request, including the first.
    pub retry_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub retry_base_delay_ms: u64,
    /// Refuse hosts other than the configured relays.
    pub restrict_to_relays: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            retry_attempts: 2,
            retry_base_delay_ms: 500,
            restrict_to_relays: true,
        }
    }
}

/// Search session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Consecutive failed pages a session may skip.
    pub max_skipped_pages: u32,
    /// Delay before moving past a failed page, in milliseconds.
    pub skip_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_skipped_pages: 3,
            skip_delay_ms: 500,
        }
    }
}

/// Normalization settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// How `tags` and `tagNames` are combined.
    pub tag_merge: TagMergePolicy,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational messages.
    Info,
    /// Debug messages.
    Debug,
    /// Everything.
    Trace,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Upstream API.
    pub api: ApiConfig,
    /// Relay chain, tried in order.
    pub relays: Vec<RelaySpec>,
    /// Network settings.
    pub network: NetworkConfig,
    /// Search session settings.
    pub search: SearchConfig,
    /// Normalization settings.
    pub catalog: CatalogConfig,
    /// Log verbosity.
    pub log_level: LogLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            relays: RelaySpec::defaults(),
            network: NetworkConfig::default(),
            search: SearchConfig::default(),
            catalog: CatalogConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl ClientConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path()).await
    }

    /// Loads and validates configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let config: Self = match load_json(path).await {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path()).await
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Checks that the configuration can build a working client.
    pub fn validate(&self) -> Result<(), StoreError> {
        let base = Url::parse(&self.api.base_url)
            .map_err(|e| StoreError::Config(format!("invalid base_url {}: {e}", self.api.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!(
                "base_url must be http(s): {}",
                self.api.base_url
            )));
        }

        if self.relays.is_empty() {
            return Err(StoreError::Config("at least one relay is required".to_string()));
        }
        if let Some(bad) = self.relays.iter().find(|r| r.host().is_none()) {
            return Err(StoreError::Config(format!(
                "relay {} has an invalid endpoint: {}",
                bad.id, bad.endpoint
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.relays.iter().find(|r| !seen.insert(r.id.as_str())) {
            return Err(StoreError::Config(format!("duplicate relay id: {}", dup.id)));
        }

        if self.network.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".to_string()));
        }

        Ok(())
    }

    /// Returns the relay request settings.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            restrict_to_relays: self.network.restrict_to_relays,
            ..FetchSettings::default()
        }
        .with_timeout(Duration::from_secs(self.network.timeout_secs))
    }

    /// Returns the whole-request retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.network.retry_attempts)
            .with_base_delay(Duration::from_millis(self.network.retry_base_delay_ms))
    }

    /// Returns the search skip-ahead policy.
    pub fn skip_policy(&self) -> SkipAheadPolicy {
        SkipAheadPolicy::new(self.search.max_skipped_pages)
            .with_delay(Duration::from_millis(self.search.skip_delay_ms))
    }

    /// Returns the normalizer options.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions::default().with_tag_merge(self.catalog.tag_merge)
    }

    /// Returns a facade builder populated from this configuration.
    pub fn api_builder(&self) -> CatalogApiBuilder {
        CatalogApi::builder()
            .base_url(self.api.base_url.clone())
            .scheme(self.api.scheme)
            .relays(self.relays.clone())
            .settings(self.fetch_settings())
            .retry(self.retry_policy())
            .normalize(self.normalize_options())
    }

    /// Builds the catalog facade.
    pub fn build_api(&self) -> CatalogApi {
        self.api_builder().build()
    }
}

// ============================================================================
// Tests
// ============================================================================
