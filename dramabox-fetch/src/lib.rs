// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DramaBox` Fetch
//!
//! Relay strategies and fallback fetching for the `DramaBox` client.
//!
//! The upstream content API cannot be called directly from a browser-style
//! client, so every request goes through a public CORS relay. Relays are
//! unreliable, so this crate tries several of them in a fixed order.
//!
//! ## Relays
//!
//! - [`strategy::RelayStrategy`] - Trait for one relay
//! - [`relay::WrappedRelay`] - `{"contents": "..."}` relays
//! - [`relay::DirectRelay`] - Pass-through relays
//! - [`validator`] - Envelope validation applied by every relay
//!
//! ## Fallback
//!
//! - [`pipeline::FallbackFetcher`] - Tries relays in order, first success wins
//! - [`retry::RetryPolicy`] - Optional whole-request retry for callers
//!
//! ## Example
//!
//! ```ignore
//! use dramabox_fetch::{FallbackFetcher, FetchContext, FetchSettings, RelaySpec};
//!
//! let specs = RelaySpec::defaults();
//! let ctx = FetchContext::for_relays(&specs, FetchSettings::default());
//! let fetcher = FallbackFetcher::with_strategies(
//!     "https://dramabox.example/api",
//!     dramabox_fetch::relay::build_relays(&specs),
//!     ctx,
//! );
//!
//! let payload = fetcher.fetch_with_fallback("/foryou/1").await?;
//! ```

pub mod context;
pub mod error;
pub mod http;
pub mod pipeline;
pub mod relay;
pub mod retry;
pub mod strategy;
pub mod validator;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, HttpError, RelayError, RelayErrorKind};

// Host APIs
pub use context::{FetchContext, FetchSettings};
pub use http::HttpClient;

// Strategy & Pipeline
pub use pipeline::{FallbackFetcher, FetchAttempt, FetchOutcome};
pub use relay::{DirectRelay, WrappedRelay, build_relay, build_relays};
pub use retry::RetryPolicy;
pub use strategy::{RelayKind, RelayResponse, RelaySpec, RelayStrategy};
pub use validator::{is_valid_envelope, is_valid_payload};
