//! Episode and playback types.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Quality Variant
// ============================================================================

/// One encoding option for an episode's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityVariant {
    /// Vertical resolution (e.g. 720).
    pub quality: u32,
    /// Stream URL for this quality.
    pub stream_url: String,
    /// Whether upstream marks this variant as the default.
    pub is_default: bool,
}

// ============================================================================
// Episode
// ============================================================================

/// One chapter of a series.
///
/// `index` is zero-based and is the canonical ordering key; within one series
/// indices are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Chapter identifier.
    pub id: String,
    /// Zero-based position in the series.
    pub index: u32,
    /// Whether the chapter is behind a paywall.
    pub is_premium: bool,
    /// Available encodings, in upstream order.
    #[serde(default)]
    pub quality_variants: Vec<QualityVariant>,
}

impl Episode {
    /// Creates an episode with no quality variants.
    pub fn new(id: impl Into<String>, index: u32, is_premium: bool) -> Self {
        Self {
            id: id.into(),
            index,
            is_premium,
            quality_variants: Vec::new(),
        }
    }

    /// Returns the one-based number shown to users.
    pub fn number(&self) -> u32 {
        self.index + 1
    }

    /// Returns the first variant flagged as default.
    pub fn default_variant(&self) -> Option<&QualityVariant> {
        self.quality_variants.iter().find(|q| q.is_default)
    }
}

// ============================================================================
// Stream Kind
// ============================================================================

/// Transport the player should use for a stream URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Adaptive streaming manifest (`.m3u8`).
    Hls,
    /// Plain progressive HTTP(S) download.
    Progressive,
}

impl StreamKind {
    /// Classifies a stream URL by the suffix of its path.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        if path.to_ascii_lowercase().ends_with(".m3u8") {
            Self::Hls
        } else {
            Self::Progressive
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hls => write!(f, "HLS"),
            Self::Progressive => write!(f, "Progressive"),
        }
    }
}

// ============================================================================
// Stream Target
// ============================================================================

/// A resolved stream for one (series, episode) pair.
///
/// Recomputed on every playback request; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamTarget {
    /// Series identifier.
    pub series_id: String,
    /// Zero-based episode index.
    pub episode_index: u32,
    /// URL handed to the player.
    pub stream_url: String,
    /// Poster image, if upstream supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Transport hint derived from the URL.
    pub kind: StreamKind,
}

impl StreamTarget {
    /// Creates a target, classifying the URL.
    pub fn new(series_id: impl Into<String>, episode_index: u32, stream_url: impl Into<String>) -> Self {
        let stream_url = stream_url.into();
        Self {
            series_id: series_id.into(),
            episode_index,
            kind: StreamKind::from_url(&stream_url),
            stream_url,
            poster_url: None,
        }
    }

    /// Sets the poster image.
    pub fn with_poster(mut self, poster_url: Option<String>) -> Self {
        self.poster_url = poster_url;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_kind_from_url() {
        assert_eq!(StreamKind::from_url("https://cdn/x/index.m3u8"), StreamKind::Hls);
        assert_eq!(
            StreamKind::from_url("https://cdn/x/index.M3U8?sign=abc"),
            StreamKind::Hls
        );
        assert_eq!(StreamKind::from_url("https://cdn/x/720p.mp4"), StreamKind::Progressive);
        assert_eq!(
            StreamKind::from_url("https://cdn/x/720p.mp4?next=.m3u8"),
            StreamKind::Progressive
        );
    }

    #[test]
    fn test_default_variant() {
        let mut episode = Episode::new("c1", 0, false);
        assert!(episode.default_variant().is_none());

        episode.quality_variants = vec![
            QualityVariant {
                quality: 480,
                stream_url: "a".to_string(),
                is_default: false,
            },
            QualityVariant {
                quality: 720,
                stream_url: "b".to_string(),
                is_default: true,
            },
        ];
        assert_eq!(episode.default_variant().map(|q| q.quality), Some(720));
        assert_eq!(episode.number(), 1);
    }
}
