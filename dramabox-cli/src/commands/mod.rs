//! CLI command implementations.

pub mod config;
pub mod episodes;
pub mod feed;
pub mod relays;
pub mod search;
pub mod watch;
