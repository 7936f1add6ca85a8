//! Episode listing and stream resolution.

use std::collections::BTreeMap;

use dramabox_core::{CatalogError, CatalogResult, Episode, QualityVariant, StreamTarget};
use serde_json::Value;
use tracing::{debug, warn};

use crate::fields::{first_string, string_like, truthy, u32_like};
use crate::shape::{ListShape, WatchShape};

// ============================================================================
// Quality Variants
// ============================================================================

fn parse_variant(raw: &Value) -> Option<QualityVariant> {
    let stream_url = raw.get("videoPath").and_then(string_like)?;
    Some(QualityVariant {
        quality: raw.get("quality").and_then(u32_like).unwrap_or_default(),
        stream_url,
        is_default: raw.get("isDefault").is_some_and(truthy),
    })
}

/// Reads quality variants from `qualities`, else from `cdnList`.
///
/// CDN lists are flattened with the default CDN first.
fn parse_variants(raw: &Value) -> Vec<QualityVariant> {
    if let Some(qualities) = raw.get("qualities").and_then(Value::as_array) {
        return qualities.iter().filter_map(parse_variant).collect();
    }

    let Some(cdns) = raw.get("cdnList").and_then(Value::as_array) else {
        return Vec::new();
    };

    let (default_cdns, other_cdns): (Vec<&Value>, Vec<&Value>) = cdns
        .iter()
        .partition(|cdn| cdn.get("isDefault").is_some_and(truthy));

    default_cdns
        .into_iter()
        .chain(other_cdns)
        .filter_map(|cdn| cdn.get("videoPathList").and_then(Value::as_array))
        .flatten()
        .filter_map(parse_variant)
        .collect()
}

// ============================================================================
// Episodes
// ============================================================================

fn parse_episode(raw: &Value) -> Option<Episode> {
    let index = raw.get("chapterIndex").and_then(u32_like)?;
    let id = first_string(raw, &["chapterId", "id"]).unwrap_or_else(|| index.to_string());
    let is_premium = raw.get("isCharge").is_some_and(truthy);

    let mut episode = Episode::new(id, index, is_premium);
    episode.quality_variants = parse_variants(raw);
    Some(episode)
}

/// Parses an episode listing payload.
///
/// Returns `None` if the payload holds no chapter list at all. Episodes are
/// ordered by index; the first entry wins on duplicate indices.
pub fn parse_episodes(payload: &Value) -> Option<Vec<Episode>> {
    let entries = ListShape::detect(payload, "chapterList").entries()?;

    let mut by_index = BTreeMap::new();
    for raw in entries {
        let Some(episode) = parse_episode(raw) else {
            debug!("Dropping chapter without index");
            continue;
        };
        if by_index.contains_key(&episode.index) {
            debug!(index = episode.index, "Dropping duplicate chapter");
            continue;
        }
        by_index.insert(episode.index, episode);
    }

    let episodes: Vec<Episode> = by_index.into_values().collect();

    let gaps = episodes
        .windows(2)
        .filter(|w| w[1].index != w[0].index + 1)
        .count();
    if gaps > 0 {
        warn!(gaps, count = episodes.len(), "Episode indices are not contiguous");
    }

    Some(episodes)
}

// ============================================================================
// Stream Resolution
// ============================================================================

/// Resolves the stream for one episode from a watch payload.
///
/// The episode must match `episode_index`: a listing is searched by
/// `chapterIndex`, and a single object carrying a different `chapterIndex` is
/// `NotFound`.
///
/// Selection: the default quality variant with a non-empty path, else the
/// top-level `videoUrl`.
pub fn resolve_stream(
    payload: &Value,
    series_id: &str,
    episode_index: u32,
) -> CatalogResult<StreamTarget> {
    let not_found = || CatalogError::NotFound(format!("episode {episode_index} of series {series_id}"));

    let chapter_index = |entry: &Value| entry.get("chapterIndex").and_then(u32_like);

    let watch: &Value = match WatchShape::detect(payload) {
        WatchShape::Single(_) => payload
            .get("data")
            .filter(|data| chapter_index(*data).is_none_or(|index| index == episode_index))
            .ok_or_else(not_found)?,
        WatchShape::Listing(entries) => entries
            .iter()
            .find(|e| chapter_index(*e) == Some(episode_index))
            .ok_or_else(not_found)?,
        WatchShape::Missing => return Err(not_found()),
    };

    let variants = parse_variants(watch);
    let stream_url = variants
        .iter()
        .find(|v| v.is_default)
        .map(|v| v.stream_url.clone())
        .or_else(|| watch.get("videoUrl").and_then(string_like))
        .ok_or_else(|| CatalogError::NoPlayableStream {
            series_id: series_id.to_string(),
            episode_index,
        })?;

    let poster = first_string(watch, &["cover", "chapterImg"]);

    Ok(StreamTarget::new(series_id, episode_index, stream_url).with_poster(poster))
}

// ============================================================================
// Tests
// ============================================================================
