//! Domain models for `DramaBox`.
//!
//! All models are request-scoped values: they are built fresh from each
//! upstream response and never mutated in place.
//!
//! ## Submodules
//!
//! - [`catalog`] - Catalog types (`CatalogItem`, `CatalogPage`, `FeedKind`)
//! - [`episode`] - Playback types (`Episode`, `QualityVariant`, `StreamTarget`)

mod catalog;
mod episode;

// Re-export everything at the models level
pub use catalog::{CatalogItem, CatalogPage, FeedKind};
pub use episode::{Episode, QualityVariant, StreamKind, StreamTarget};
