//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use dramabox_core::{CatalogItem, Episode, StreamTarget};
use serde::{Serialize, Serializer};

use super::RelayProbe;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for an accumulated listing (feed, search or suggestions).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingOutput<'a> {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<&'a str>,
    pub pages: u32,
    pub has_more: bool,
    pub count: usize,
    pub items: &'a [CatalogItem],
    #[serde(serialize_with = "serialize_datetime")]
    pub fetched_at: DateTime<Utc>,
}

/// JSON output for a series' episode list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesOutput<'a> {
    pub series_id: &'a str,
    pub count: usize,
    pub episodes: &'a [Episode],
    #[serde(serialize_with = "serialize_datetime")]
    pub fetched_at: DateTime<Utc>,
}

/// JSON output for a resolved stream.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamOutput<'a> {
    #[serde(flatten)]
    pub target: &'a StreamTarget,
    pub episode_number: u32,
    #[serde(serialize_with = "serialize_datetime")]
    pub resolved_at: DateTime<Utc>,
}

/// JSON output for one relay probe.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayProbeOutput {
    pub id: String,
    pub kind: String,
    pub ok: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&RelayProbe> for RelayProbeOutput {
    fn from(probe: &RelayProbe) -> Self {
        Self {
            id: probe.id.clone(),
            kind: probe.kind.display_name().to_string(),
            ok: probe.ok,
            duration_ms: u64::try_from(probe.duration.as_millis()).unwrap_or(u64::MAX),
            error: probe.error.clone(),
        }
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats an accumulated listing.
    pub fn format_listing(
        &self,
        source: &str,
        keyword: Option<&str>,
        pages: u32,
        has_more: bool,
        items: &[CatalogItem],
    ) -> Result<String> {
        self.format(&ListingOutput {
            source: source.to_string(),
            keyword,
            pages,
            has_more,
            count: items.len(),
            items,
            fetched_at: Utc::now(),
        })
    }

    /// Formats an episode list.
    pub fn format_episodes(&self, series_id: &str, episodes: &[Episode]) -> Result<String> {
        self.format(&EpisodesOutput {
            series_id,
            count: episodes.len(),
            episodes,
            fetched_at: Utc::now(),
        })
    }

    /// Formats a resolved stream.
    pub fn format_stream(&self, target: &StreamTarget) -> Result<String> {
        self.format(&StreamOutput {
            target,
            episode_number: target.episode_index + 1,
            resolved_at: Utc::now(),
        })
    }

    /// Formats relay probe results.
    pub fn format_relays(&self, probes: &[RelayProbe]) -> Result<String> {
        let outputs: Vec<RelayProbeOutput> = probes.iter().map(RelayProbeOutput::from).collect();
        self.format(&outputs)
    }
}
