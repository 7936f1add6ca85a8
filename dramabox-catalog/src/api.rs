//! Catalog API facade.
//!
//! One operation per UI need. Each composes the fallback fetcher with the
//! normalizer and translates every lower-level failure into a
//! [`CatalogError`], so nothing untyped crosses this boundary.

use dramabox_core::{
    CatalogError, CatalogItem, CatalogPage, CatalogResult, CatalogSource, Episode, FeedKind,
    StreamTarget,
};
use dramabox_fetch::{
    FallbackFetcher, FetchContext, FetchError, FetchSettings, RelaySpec, RetryPolicy, build_relays,
};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::endpoints::{EndpointScheme, SchemeKind};
use crate::episodes::{parse_episodes, resolve_stream};
use crate::normalizer::{NormalizeOptions, Normalizer};

/// Upstream API the client talks to unless configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://dramabox.sansekai.my.id/api/dramabox";

/// Translates an exhausted relay chain into the facade's failure type.
pub fn network_failure(error: FetchError) -> CatalogError {
    let attempts = error.attempt_errors();
    let last_error = match &error {
        FetchError::Exhausted { last, .. } => last.to_string(),
        FetchError::NoStrategies => error.to_string(),
    };
    CatalogError::NetworkExhausted {
        attempts,
        last_error,
    }
}

fn require_non_blank<'a>(value: &'a str, what: &str) -> CatalogResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CatalogError::InvalidArgument(format!("{what} must not be empty")))
    } else {
        Ok(trimmed)
    }
}

fn require_page(page: u32) -> CatalogResult<()> {
    if page == 0 {
        Err(CatalogError::InvalidArgument("pages start at 1".to_string()))
    } else {
        Ok(())
    }
}

// ============================================================================
// Catalog API
// ============================================================================

/// The catalog facade over one upstream deployment.
pub struct CatalogApi {
    fetcher: FallbackFetcher,
    scheme: Box<dyn EndpointScheme>,
    normalizer: Normalizer,
    retry: RetryPolicy,
}

impl CatalogApi {
    /// Creates a facade with default retry and normalization settings.
    pub fn new(fetcher: FallbackFetcher, scheme: Box<dyn EndpointScheme>) -> Self {
        Self {
            fetcher,
            scheme,
            normalizer: Normalizer::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Returns a builder starting from the default deployment.
    pub fn builder() -> CatalogApiBuilder {
        CatalogApiBuilder::default()
    }

    /// Sets the retry policy for whole requests.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the normalizer options.
    pub fn with_normalize_options(mut self, options: NormalizeOptions) -> Self {
        self.normalizer = Normalizer::new(options);
        self
    }

    /// Returns the underlying fetcher.
    pub fn fetcher(&self) -> &FallbackFetcher {
        &self.fetcher
    }

    /// Returns the active endpoint scheme.
    pub fn scheme(&self) -> &dyn EndpointScheme {
        self.scheme.as_ref()
    }

    /// Fetches popular search entries.
    #[instrument(skip(self))]
    pub async fn list_popular_searches(&self) -> CatalogResult<Vec<CatalogItem>> {
        let payload = self.fetch(&self.scheme.popular_searches_path()).await?;
        Ok(self.normalizer.catalog_page(&payload).items)
    }

    async fn fetch(&self, path: &str) -> CatalogResult<Value> {
        self.retry
            .run(|| self.fetcher.fetch_with_fallback(path))
            .await
            .map_err(network_failure)
    }

    #[instrument(skip(self), fields(scheme = %self.scheme.kind()))]
    async fn feed_page(&self, feed: FeedKind, page: u32) -> CatalogResult<CatalogPage> {
        require_page(page)?;
        if page > 1 && !self.scheme.supports_paging() {
            debug!("Scheme is unpaged; no further pages");
            return Ok(CatalogPage::empty());
        }

        let payload = self.fetch(&self.scheme.feed_path(feed, page)).await?;
        self.listing(&payload, page, feed.display_name())
    }

    /// Normalizes a listing. An unrecognised page 1 is `NotFound`; an
    /// unrecognised later page ends the listing.
    fn listing(&self, payload: &Value, page: u32, what: &str) -> CatalogResult<CatalogPage> {
        match self.normalizer.listing(payload) {
            Some(mut result) => {
                if !self.scheme.supports_paging() {
                    result.has_more = false;
                }
                Ok(result)
            }
            None if page == 1 => Err(CatalogError::NotFound(format!(
                "{what}: unrecognized listing payload"
            ))),
            None => Ok(CatalogPage::empty()),
        }
    }
}

impl CatalogSource for CatalogApi {
    async fn list_for_you(&self, page: u32) -> CatalogResult<CatalogPage> {
        self.feed_page(FeedKind::ForYou, page).await
    }

    async fn list_new(&self, page: u32) -> CatalogResult<CatalogPage> {
        self.feed_page(FeedKind::New, page).await
    }

    async fn list_trending(&self, page: u32) -> CatalogResult<CatalogPage> {
        self.feed_page(FeedKind::Trending, page).await
    }

    #[instrument(skip(self))]
    async fn search(&self, keyword: &str, page: u32) -> CatalogResult<CatalogPage> {
        let keyword = require_non_blank(keyword, "search keyword")?;
        require_page(page)?;
        if page > 1 && !self.scheme.supports_paging() {
            return Ok(CatalogPage::empty());
        }

        let payload = self.fetch(&self.scheme.search_path(keyword, page)).await?;
        self.listing(&payload, page, "search")
    }

    #[instrument(skip(self))]
    async fn suggest(&self, keyword: &str) -> CatalogResult<Vec<CatalogItem>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        let payload = self.fetch(&self.scheme.suggest_path(keyword)).await?;
        Ok(self.normalizer.suggestions(&payload))
    }

    #[instrument(skip(self))]
    async fn list_episodes(&self, series_id: &str) -> CatalogResult<Vec<Episode>> {
        let series_id = require_non_blank(series_id, "series id")?;
        let payload = self.fetch(&self.scheme.episodes_path(series_id)).await?;

        parse_episodes(&payload)
            .ok_or_else(|| CatalogError::NotFound(format!("episodes of series {series_id}")))
    }

    #[instrument(skip(self))]
    async fn resolve_stream_target(
        &self,
        series_id: &str,
        episode_index: u32,
    ) -> CatalogResult<StreamTarget> {
        let series_id = require_non_blank(series_id, "series id")?;
        let payload = self
            .fetch(&self.scheme.watch_path(series_id, episode_index))
            .await?;

        resolve_stream(&payload, series_id, episode_index)
    }
}

impl std::fmt::Debug for CatalogApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApi")
            .field("fetcher", &self.fetcher)
            .field("scheme", &self.scheme.kind())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`CatalogApi`] from declarative settings.
#[derive(Debug, Clone)]
pub struct CatalogApiBuilder {
    base_url: String,
    scheme: SchemeKind,
    relays: Vec<RelaySpec>,
    settings: FetchSettings,
    retry: RetryPolicy,
    normalize: NormalizeOptions,
}

impl Default for CatalogApiBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            scheme: SchemeKind::default(),
            relays: RelaySpec::defaults(),
            settings: FetchSettings::default(),
            retry: RetryPolicy::default(),
            normalize: NormalizeOptions::default(),
        }
    }
}

impl CatalogApiBuilder {
    /// Sets the upstream base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the endpoint scheme.
    pub fn scheme(mut self, scheme: SchemeKind) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the relay chain, in attempt order.
    pub fn relays(mut self, relays: Vec<RelaySpec>) -> Self {
        self.relays = relays;
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the normalizer options.
    pub fn normalize(mut self, options: NormalizeOptions) -> Self {
        self.normalize = options;
        self
    }

    /// Builds the facade.
    pub fn build(self) -> CatalogApi {
        let ctx = FetchContext::for_relays(&self.relays, self.settings);
        let fetcher =
            FallbackFetcher::with_strategies(self.base_url, build_relays(&self.relays), ctx);

        CatalogApi::new(fetcher, self.scheme.build())
            .with_retry(self.retry)
            .with_normalize_options(self.normalize)
    }
}

// ============================================================================
// Tests
// ============================================================================
