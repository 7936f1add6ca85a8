//! Trait definitions for `DramaBox`.
//!
//! This module defines the catalog contract consumed by pages and by the
//! caller-side state helpers.

use crate::error::CatalogResult;
use crate::models::{CatalogItem, CatalogPage, Episode, FeedKind, StreamTarget};

/// A source of catalog data.
///
/// Implementors are responsible for:
/// - Reaching the upstream content API
/// - Normalizing divergent response shapes into catalog types
/// - Translating every lower-level failure into a [`crate::CatalogError`]
///
/// Page numbers are 1-based. Calls are independent of each other and may be
/// in flight concurrently.
pub trait CatalogSource: Send + Sync {
    /// Fetches one page of personalised recommendations.
    fn list_for_you(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = CatalogResult<CatalogPage>> + Send;

    /// Fetches one page of latest releases.
    fn list_new(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = CatalogResult<CatalogPage>> + Send;

    /// Fetches one page of the trending ranking.
    fn list_trending(
        &self,
        page: u32,
    ) -> impl std::future::Future<Output = CatalogResult<CatalogPage>> + Send;

    /// Searches the catalog.
    ///
    /// An empty or whitespace-only keyword fails with `InvalidArgument`
    /// without any network call.
    fn search(
        &self,
        keyword: &str,
        page: u32,
    ) -> impl std::future::Future<Output = CatalogResult<CatalogPage>> + Send;

    /// Fetches lightweight type-ahead suggestions.
    fn suggest(
        &self,
        keyword: &str,
    ) -> impl std::future::Future<Output = CatalogResult<Vec<CatalogItem>>> + Send;

    /// Fetches the episodes of a series, ordered by index.
    fn list_episodes(
        &self,
        series_id: &str,
    ) -> impl std::future::Future<Output = CatalogResult<Vec<Episode>>> + Send;

    /// Resolves the stream URL for one episode.
    fn resolve_stream_target(
        &self,
        series_id: &str,
        episode_index: u32,
    ) -> impl std::future::Future<Output = CatalogResult<StreamTarget>> + Send;

    /// Fetches one page of the given feed.
    ///
    /// Default implementation dispatches to the per-feed methods.
    fn list_feed(
        &self,
        feed: FeedKind,
        page: u32,
    ) -> impl std::future::Future<Output = CatalogResult<CatalogPage>> + Send {
        async move {
            match feed {
                FeedKind::ForYou => self.list_for_you(page).await,
                FeedKind::New => self.list_new(page).await,
                FeedKind::Trending => self.list_trending(page).await,
            }
        }
    }
}
