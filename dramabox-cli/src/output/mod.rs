//! Output formatting for CLI.

mod json;
mod text;

use std::time::Duration;

use dramabox_fetch::{FetchOutcome, RelayKind};

pub use json::JsonFormatter;
pub use text::TextFormatter;
#[cfg(test)]
mod tests;

/// Result of probing one relay on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayProbe {
    /// Relay identifier.
    pub id: String,
    /// Response convention.
    pub kind: RelayKind,
    /// Whether the relay answered with a valid payload.
    pub ok: bool,
    /// Time the probe took.
    pub duration: Duration,
    /// Failure description, if any.
    pub error: Option<String>,
}

impl RelayProbe {
    /// Builds a probe result from a single-relay fetch outcome.
    pub fn from_outcome(id: &str, kind: RelayKind, outcome: &FetchOutcome) -> Self {
        Self {
            id: id.to_string(),
            kind,
            ok: outcome.is_success(),
            duration: outcome.duration,
            error: outcome.errors().first().map(ToString::to_string),
        }
    }
}
