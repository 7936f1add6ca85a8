//! Catalog payload normalization.
//!
//! Turns any recognised upstream listing into a flat [`CatalogPage`]:
//!
//! 1. Detect the payload shape ([`ListShape`]).
//! 2. Classify each raw entry as a series or a tag-card wrapper.
//! 3. Flatten wrappers exactly one level, in place.
//! 4. Parse leaves, dropping anything without an id, a title and a cover.
//!
//! [`Normalizer::listing`] reports unrecognised payloads as `None`;
//! [`Normalizer::catalog_page`] turns them into an empty page.

use dramabox_core::{CatalogItem, CatalogPage};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::fields::{f64_like, first_string, string_like, u32_like};
use crate::shape::ListShape;

/// `cardType` value marking a tag-card wrapper.
const TAG_CARD_TYPE: u32 = 3;

// ============================================================================
// Options
// ============================================================================

/// How `tags` and `tagNames` are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMergePolicy {
    /// `tags` followed by `tagNames`, duplicates kept.
    #[default]
    Concatenate,
    /// Same order, later duplicates removed.
    Deduplicate,
}

/// Normalizer options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Tag merge policy.
    pub tag_merge: TagMergePolicy,
}

impl NormalizeOptions {
    /// Sets the tag merge policy.
    pub fn with_tag_merge(mut self, policy: TagMergePolicy) -> Self {
        self.tag_merge = policy;
        self
    }
}

// ============================================================================
// Entry Classification
// ============================================================================

/// A raw listing entry.
enum Entry<'a> {
    /// A single series.
    Leaf(&'a Value),
    /// A tag-card wrapper holding nested series.
    Group(&'a [Value]),
}

impl<'a> Entry<'a> {
    fn classify(raw: &'a Value) -> Self {
        let is_card = raw.get("cardType").and_then(u32_like) == Some(TAG_CARD_TYPE)
            || raw.get("tagCardVo").is_some_and(Value::is_object);

        if !is_card {
            return Self::Leaf(raw);
        }

        let nested = raw
            .pointer("/tagCardVo/tagBooks")
            .or_else(|| raw.get("tagBooks"))
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);

        Self::Group(nested)
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Converts raw upstream listings into catalog items.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Creates a normalizer.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    pub fn options(&self) -> NormalizeOptions {
        self.options
    }

    /// Normalizes a catalog listing payload, or `None` if no listing shape
    /// is recognised.
    pub fn listing(&self, payload: &Value) -> Option<CatalogPage> {
        let (list, has_more) = match ListShape::detect(payload, "list") {
            ListShape::BareList(list) | ListShape::DataList(list) => (list, !list.is_empty()),
            ListShape::Enveloped { list, is_more } => (list, is_more.unwrap_or(!list.is_empty())),
            ListShape::Unrecognized => {
                warn!("Unrecognized catalog payload shape");
                return None;
            }
        };

        Some(CatalogPage::new(self.items(list), has_more))
    }

    /// Normalizes a catalog listing payload; unrecognised payloads become an
    /// empty, final page.
    pub fn catalog_page(&self, payload: &Value) -> CatalogPage {
        self.listing(payload).unwrap_or_default()
    }

    /// Normalizes a suggestion payload.
    ///
    /// Reads `data.suggestList` and falls back to any catalog listing shape.
    pub fn suggestions(&self, payload: &Value) -> Vec<CatalogItem> {
        match ListShape::detect(payload, "suggestList") {
            ListShape::Enveloped { list, .. } => self.items(list),
            _ => self.catalog_page(payload).items,
        }
    }

    /// Normalizes a list of raw entries, flattening tag cards one level.
    pub fn items(&self, entries: &[Value]) -> Vec<CatalogItem> {
        let mut items = Vec::with_capacity(entries.len());

        for raw in entries {
            match Entry::classify(raw) {
                Entry::Leaf(leaf) => items.extend(self.item(leaf)),
                Entry::Group(nested) => {
                    debug!(nested = nested.len(), "Flattening tag card");
                    // One level only: wrappers nested inside wrappers are dropped.
                    items.extend(
                        nested
                            .iter()
                            .filter_map(|n| match Entry::classify(n) {
                                Entry::Leaf(leaf) => self.item(leaf),
                                Entry::Group(_) => None,
                            }),
                    );
                }
            }
        }

        items
    }

    /// Parses one series entry.
    ///
    /// Returns `None` if the id, the title, or both covers are missing.
    pub fn item(&self, raw: &Value) -> Option<CatalogItem> {
        let id = first_string(raw, &["bookId", "id"])?;
        let title = first_string(raw, &["bookName", "title"])?;

        let cover_url = raw.get("cover").and_then(string_like);
        let cover_url_alt = raw.get("coverWap").and_then(string_like);
        if cover_url.is_none() && cover_url_alt.is_none() {
            debug!(id = %id, "Dropping entry without cover");
            return None;
        }

        Some(CatalogItem {
            id,
            title,
            cover_url,
            cover_url_alt,
            summary: raw.get("introduction").and_then(string_like),
            tags: self.merge_tags(raw),
            episode_count: raw.get("chapterCount").and_then(u32_like),
            play_count_display: raw.get("playCount").and_then(string_like),
            score: raw.get("score").and_then(f64_like),
        })
    }

    fn merge_tags(&self, raw: &Value) -> Vec<String> {
        let mut tags: Vec<String> = ["tags", "tagNames"]
            .iter()
            .filter_map(|key| raw.get(key).and_then(Value::as_array))
            .flatten()
            .filter_map(tag_label)
            .collect();

        if self.options.tag_merge == TagMergePolicy::Deduplicate {
            let mut seen = std::collections::HashSet::new();
            tags.retain(|t| seen.insert(t.clone()));
        }

        tags
    }
}

/// Reads a tag as a plain string or a `{ tagName }` object.
fn tag_label(tag: &Value) -> Option<String> {
    match tag {
        Value::Object(_) => first_string(tag, &["tagName", "tagEnName"]),
        other => string_like(other),
    }
}

/// Normalizes a catalog payload with default options.
pub fn normalize_catalog_payload(payload: &Value) -> CatalogPage {
    Normalizer::default().catalog_page(payload)
}

// ============================================================================
// Tests
// ============================================================================
