// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DramaBox` Store
//!
//! Configuration and caller-side state for the `DramaBox` client.
//!
//! This crate provides:
//!
//! - **ClientConfig**: JSON configuration that builds the catalog facade
//! - **CatalogFeed**: Page accumulation with stale-result discarding
//! - **SearchSession**: Paged search with capped skip-ahead
//! - **Generation**: Tokens for last-write-wins consumption
//!
//! ## Usage
//!
//! ```ignore
//! use dramabox_core::FeedKind;
//! use dramabox_store::{CatalogFeed, ClientConfig};
//!
//! let config = ClientConfig::load().await?;
//! let api = config.build_api();
//!
//! let mut feed = CatalogFeed::new(FeedKind::Trending);
//! feed.load_first(&api).await;
//! while feed.has_more() {
//!     feed.load_more(&api).await;
//! }
//! ```

pub mod config;
pub mod error;
pub mod feed;
pub mod generation;
pub mod persistence;
pub mod search;

pub use config::{ApiConfig, CatalogConfig, ClientConfig, LogLevel, NetworkConfig, SearchConfig};
pub use error::StoreError;
pub use feed::{CatalogFeed, FeedUpdate, PageRequest};
pub use generation::{Generation, GenerationCounter};
pub use persistence::{default_config_dir, default_config_path, load_json, save_json};
pub use search::{SearchProgress, SearchSession, SkipAheadPolicy};
