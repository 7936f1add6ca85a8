//! Upstream payload shape detection.
//!
//! The upstream API has answered the same request in several shapes over
//! time. Payloads are classified here, once, before any field is read; the
//! normalizer and episode parser only ever match on these enums.

use serde_json::{Map, Value};

// ============================================================================
// List Shape
// ============================================================================

/// How a list-bearing payload is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListShape<'a> {
    /// The payload itself is an array.
    BareList(&'a [Value]),
    /// `{ data: { <key>: [...], isMore? } }`.
    Enveloped {
        /// The list under `data.<key>`.
        list: &'a [Value],
        /// `data.isMore`, when upstream sent a boolean.
        is_more: Option<bool>,
    },
    /// `{ data: [...] }`.
    DataList(&'a [Value]),
    /// None of the above.
    Unrecognized,
}

impl<'a> ListShape<'a> {
    /// Classifies `payload`, looking for the list under `data.<key>`.
    ///
    /// Precedence: bare array, then `data.<key>`, then `data` as an array.
    pub fn detect(payload: &'a Value, key: &str) -> Self {
        if let Value::Array(items) = payload {
            return Self::BareList(items);
        }

        let Some(data) = payload.get("data") else {
            return Self::Unrecognized;
        };

        if let Some(Value::Array(list)) = data.get(key) {
            return Self::Enveloped {
                list,
                is_more: data.get("isMore").and_then(Value::as_bool),
            };
        }

        match data {
            Value::Array(list) => Self::DataList(list),
            _ => Self::Unrecognized,
        }
    }

    /// Returns the raw entries, if the shape carries any.
    pub fn entries(&self) -> Option<&'a [Value]> {
        match *self {
            Self::BareList(list) | Self::DataList(list) | Self::Enveloped { list, .. } => Some(list),
            Self::Unrecognized => None,
        }
    }

    /// Returns true if no list was found.
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized)
    }
}

// ============================================================================
// Watch Shape
// ============================================================================

/// How a watch-link payload is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatchShape<'a> {
    /// `{ data: { videoUrl, qualities, ... } }` for exactly one episode.
    Single(&'a Map<String, Value>),
    /// A listing of every episode; the caller picks by `chapterIndex`.
    Listing(&'a [Value]),
    /// No usable watch data.
    Missing,
}

impl<'a> WatchShape<'a> {
    /// Classifies a watch payload.
    pub fn detect(payload: &'a Value) -> Self {
        if let Some(list) = ListShape::detect(payload, "chapterList").entries() {
            return Self::Listing(list);
        }

        match payload.get("data") {
            Some(Value::Object(data)) => Self::Single(data),
            _ => Self::Missing,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
