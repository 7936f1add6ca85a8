// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DramaBox` Core
//!
//! Core types, failure kinds, and traits for the `DramaBox` client.
//!
//! This crate provides the foundational abstractions used across all other
//! `DramaBox` crates, including:
//!
//! - Catalog value types (series, episodes, stream targets, pages)
//! - The failure taxonomy callers branch on
//! - The [`CatalogSource`] trait implemented by the catalog facade
//!
//! ## Key Types
//!
//! ### Catalog Types
//! - [`CatalogItem`] - One playable series (a leaf catalog entry)
//! - [`CatalogPage`] - A single paginated fetch result
//! - [`FeedKind`] - The browsable listings (for you, new, trending)
//!
//! ### Playback Types
//! - [`Episode`] - One chapter of a series
//! - [`QualityVariant`] - One encoding option for an episode
//! - [`StreamTarget`] - A resolved stream URL for one episode
//! - [`StreamKind`] - HLS manifest vs progressive download
//!
//! ### Failures
//! - [`CatalogError`] - Typed failure outcome of every catalog operation
//! - [`FailureKind`] - Plain discriminant for UI branching

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::{CatalogError, CatalogResult, FailureKind};

// Re-export all model types
pub use models::{
    // Catalog types
    CatalogItem,
    CatalogPage,
    FeedKind,
    // Playback types
    Episode,
    QualityVariant,
    StreamKind,
    StreamTarget,
};

// Re-export traits
pub use traits::CatalogSource;
