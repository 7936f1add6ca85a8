// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DramaBox` Catalog
//!
//! Normalization of upstream payloads and the catalog API facade.
//!
//! ## Normalization
//!
//! - [`shape`] - Tagged-union detection of upstream payload layouts
//! - [`normalizer::Normalizer`] - Listings to flat [`dramabox_core::CatalogPage`]s
//! - [`episodes`] - Chapter lists and stream selection
//!
//! ## Facade
//!
//! - [`endpoints::EndpointScheme`] - Maps operations to upstream paths
//! - [`api::CatalogApi`] - Implements [`dramabox_core::CatalogSource`]
//!
//! ## Example
//!
//! ```ignore
//! use dramabox_catalog::CatalogApi;
//! use dramabox_core::CatalogSource;
//!
//! let api = CatalogApi::builder().build();
//! let page = api.list_trending(1).await?;
//! for item in &page.items {
//!     println!("{} - {}", item.id, item.title);
//! }
//! ```

pub mod api;
pub mod endpoints;
pub mod episodes;
mod fields;
pub mod normalizer;
pub mod shape;

pub use api::{CatalogApi, CatalogApiBuilder, DEFAULT_BASE_URL, network_failure};
pub use endpoints::{EndpointScheme, PagedScheme, QueryScheme, SchemeKind};
pub use episodes::{parse_episodes, resolve_stream};
pub use normalizer::{NormalizeOptions, Normalizer, TagMergePolicy, normalize_catalog_payload};
pub use shape::{ListShape, WatchShape};
