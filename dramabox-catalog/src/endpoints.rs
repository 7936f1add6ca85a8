//! Upstream endpoint schemes.
//!
//! The upstream API has been deployed with two URL conventions. A scheme
//! maps each catalog operation to an endpoint path relative to the base URL;
//! exactly one scheme is active per client.

use std::fmt;

use dramabox_core::FeedKind;
use serde::{Deserialize, Serialize};

/// Percent-encodes a value for use inside a path segment or query value.
fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// ============================================================================
// Scheme Trait
// ============================================================================

/// Maps catalog operations to endpoint paths.
pub trait EndpointScheme: Send + Sync + fmt::Debug {
    /// Which convention this is.
    fn kind(&self) -> SchemeKind;

    /// Whether feeds and search honour the page number.
    ///
    /// When false, only page 1 exists and it never reports more pages.
    fn supports_paging(&self) -> bool;

    /// Path for one page of a feed.
    fn feed_path(&self, feed: FeedKind, page: u32) -> String;

    /// Path for one page of search results.
    fn search_path(&self, keyword: &str, page: u32) -> String;

    /// Path for type-ahead suggestions.
    fn suggest_path(&self, keyword: &str) -> String;

    /// Path for the popular search terms list.
    fn popular_searches_path(&self) -> String {
        "/populersearch".to_string()
    }

    /// Path for a series' episode listing.
    fn episodes_path(&self, series_id: &str) -> String;

    /// Path for one episode's watch data.
    fn watch_path(&self, series_id: &str, episode_index: u32) -> String;
}

// ============================================================================
// Paged Scheme
// ============================================================================

/// Path-segment convention: `/foryou/{page}`, `/watch/{id}/{index}`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct PagedScheme;

impl EndpointScheme for PagedScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Paged
    }

    fn supports_paging(&self) -> bool {
        true
    }

    fn feed_path(&self, feed: FeedKind, page: u32) -> String {
        let segment = match feed {
            FeedKind::ForYou => "foryou",
            FeedKind::New => "new",
            FeedKind::Trending => "rank",
        };
        format!("/{segment}/{page}")
    }

    fn search_path(&self, keyword: &str, page: u32) -> String {
        format!("/search/{}/{page}", encode(keyword))
    }

    fn suggest_path(&self, keyword: &str) -> String {
        format!("/suggest/{}", encode(keyword))
    }

    fn episodes_path(&self, series_id: &str) -> String {
        format!("/chapters/{}", encode(series_id))
    }

    fn watch_path(&self, series_id: &str, episode_index: u32) -> String {
        format!("/watch/{}/{episode_index}", encode(series_id))
    }
}

// ============================================================================
// Query Scheme
// ============================================================================

/// Query-string convention: `/latest`, `/search?query=`, `/stream?bookId=`.
///
/// Feeds are unpaged, suggestions reuse search, and both episodes and watch
/// data come from the same stream listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryScheme;

impl EndpointScheme for QueryScheme {
    fn kind(&self) -> SchemeKind {
        SchemeKind::Query
    }

    fn supports_paging(&self) -> bool {
        false
    }

    fn feed_path(&self, feed: FeedKind, _page: u32) -> String {
        match feed {
            FeedKind::ForYou => "/foryou",
            FeedKind::New => "/latest",
            FeedKind::Trending => "/trending",
        }
        .to_string()
    }

    fn search_path(&self, keyword: &str, _page: u32) -> String {
        format!("/search?query={}", encode(keyword))
    }

    fn suggest_path(&self, keyword: &str) -> String {
        self.search_path(keyword, 1)
    }

    fn episodes_path(&self, series_id: &str) -> String {
        format!("/stream?bookId={}", encode(series_id))
    }

    fn watch_path(&self, series_id: &str, _episode_index: u32) -> String {
        self.episodes_path(series_id)
    }
}

// ============================================================================
// Scheme Kind
// ============================================================================

/// Configurable choice of endpoint scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    /// [`PagedScheme`].
    Paged,
    /// [`QueryScheme`].
    #[default]
    Query,
}

impl SchemeKind {
    /// Builds the scheme.
    pub fn build(self) -> Box<dyn EndpointScheme> {
        match self {
            Self::Paged => Box::new(PagedScheme),
            Self::Query => Box::new(QueryScheme),
        }
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Paged => "paged",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for SchemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paged" => Ok(Self::Paged),
            "query" => Ok(Self::Query),
            other => Err(format!("unknown endpoint scheme: {other}")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_paths() {
        let s = PagedScheme;
        assert_eq!(s.feed_path(FeedKind::ForYou, 1), "/foryou/1");
        assert_eq!(s.feed_path(FeedKind::New, 2), "/new/2");
        assert_eq!(s.feed_path(FeedKind::Trending, 3), "/rank/3");
        assert_eq!(s.search_path("ceo wife", 1), "/search/ceo%20wife/1");
        assert_eq!(s.suggest_path("a/b"), "/suggest/a%2Fb");
        assert_eq!(s.episodes_path("41000102"), "/chapters/41000102");
        assert_eq!(s.watch_path("41000102", 4), "/watch/41000102/4");
        assert_eq!(s.popular_searches_path(), "/populersearch");
    }

    #[test]
    fn test_query_paths() {
        let s = QueryScheme;
        assert!(!s.supports_paging());
        assert_eq!(s.feed_path(FeedKind::ForYou, 5), "/foryou");
        assert_eq!(s.feed_path(FeedKind::New, 1), "/latest");
        assert_eq!(s.feed_path(FeedKind::Trending, 1), "/trending");
        assert_eq!(s.search_path("love & war", 1), "/search?query=love%20%26%20war");
        assert_eq!(s.suggest_path("x"), s.search_path("x", 1));
        assert_eq!(s.watch_path("9", 3), "/stream?bookId=9");
    }

    #[test]
    fn test_scheme_kind() {
        assert_eq!("Query".parse::<SchemeKind>(), Ok(SchemeKind::Query));
        assert!("rest".parse::<SchemeKind>().is_err());
        assert_eq!(SchemeKind::default().build().kind(), SchemeKind::Query);
        assert_eq!(SchemeKind::Paged.build().kind(), SchemeKind::Paged);
        assert_eq!(serde_json::to_string(&SchemeKind::Query).unwrap(), "\"query\"");
    }
}
