//! Generation tokens for last-write-wins consumption.
//!
//! Every logical request takes a token when it starts. When its result
//! arrives the consumer checks the token; results from superseded requests
//! are discarded rather than cancelled at the network layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Shared counter handing out generation tokens.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    current: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Creates a counter at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every earlier token.
    pub fn advance(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Returns the latest generation.
    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::SeqCst))
    }

    /// Returns true if `token` has not been superseded.
    pub fn is_current(&self, token: Generation) -> bool {
        self.current() == token
    }
}
