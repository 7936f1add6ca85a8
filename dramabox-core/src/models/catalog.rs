//! Catalog-related types.
//!
//! - [`CatalogItem`] - One playable series
//! - [`CatalogPage`] - One page of catalog items
//! - [`FeedKind`] - The browsable listings

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Catalog Item
// ============================================================================

/// A leaf catalog entry: one playable short-drama series.
///
/// At least one of `cover_url` / `cover_url_alt` is always set; the
/// normalizer drops entries that have neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable series identifier.
    pub id: String,
    /// Series title.
    pub title: String,
    /// Primary cover image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Secondary cover image, used when the primary is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url_alt: Option<String>,
    /// Short synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Tags, in source order. Never null.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Number of published episodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<u32>,
    /// Pre-formatted play count (e.g. "18.3M").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_count_display: Option<String>,
    /// Rating score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl CatalogItem {
    /// Creates an item with a primary cover and no optional metadata.
    pub fn new(id: impl Into<String>, title: impl Into<String>, cover_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cover_url: Some(cover_url.into()),
            cover_url_alt: None,
            summary: None,
            tags: Vec::new(),
            episode_count: None,
            play_count_display: None,
            score: None,
        }
    }

    /// Returns the cover to display: the primary cover, else the secondary one.
    pub fn poster_url(&self) -> Option<&str> {
        self.cover_url
            .as_deref()
            .or(self.cover_url_alt.as_deref())
    }

    /// Sets the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the synopsis.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

// ============================================================================
// Catalog Page
// ============================================================================

/// A single paginated fetch result.
///
/// Callers accumulate successive pages into one displayed list; this type
/// never accumulates by itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    /// Items in upstream order.
    pub items: Vec<CatalogItem>,
    /// Whether a further page is likely available.
    pub has_more: bool,
}

impl CatalogPage {
    /// Creates a page.
    pub fn new(items: Vec<CatalogItem>, has_more: bool) -> Self {
        Self { items, has_more }
    }

    /// Creates an empty, final page.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the page carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Feed Kind
// ============================================================================

/// The paginated listings a user can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Personalised recommendations.
    ForYou,
    /// Latest releases.
    New,
    /// Ranked / trending list.
    Trending,
}

impl FeedKind {
    /// Returns the display name for this feed.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ForYou => "For You",
            Self::New => "New Release",
            Self::Trending => "Global Ranking",
        }
    }

    /// Returns all feeds.
    pub fn all() -> &'static [FeedKind] {
        &[Self::ForYou, Self::New, Self::Trending]
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Tests
// ============================================================================
