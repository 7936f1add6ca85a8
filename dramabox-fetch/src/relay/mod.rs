//! Concrete relay strategies.
//!
//! - [`wrapped`] - Relays that answer `{"contents": "<upstream body>"}`
//! - [`direct`] - Relays that pass the upstream body through unchanged

pub mod direct;
pub mod wrapped;

pub use direct::{DirectRelay, decode_direct_body};
pub use wrapped::{WrappedRelay, decode_wrapped_body};

use crate::strategy::{RelayKind, RelaySpec, RelayStrategy};

/// Percent-encodes an upstream URL for use as a relay query value.
pub fn encode_target(target_url: &str) -> String {
    url::form_urlencoded::byte_serialize(target_url.as_bytes()).collect()
}

/// Builds the strategy for a relay spec.
pub fn build_relay(spec: &RelaySpec) -> Box<dyn RelayStrategy> {
    match spec.kind {
        RelayKind::Wrapped => Box::new(WrappedRelay::new(&spec.id, &spec.endpoint)),
        RelayKind::Direct => Box::new(DirectRelay::new(&spec.id, &spec.endpoint)),
        RelayKind::SecondaryDirect => Box::new(DirectRelay::secondary(&spec.id, &spec.endpoint)),
    }
}

/// Builds the strategies for a list of specs, preserving order.
pub fn build_relays(specs: &[RelaySpec]) -> Vec<Box<dyn RelayStrategy>> {
    specs.iter().map(build_relay).collect()
}
