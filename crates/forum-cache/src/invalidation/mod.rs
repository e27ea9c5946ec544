//! Typed cache invalidation
//!
//! Cache keys are derived structurally from domain events; no hand-enumerated
//! string tags. `fanout` computes the keys an event invalidates,
//! `refresh_channels` the pub/sub channels that get a refresh notice.

mod flag_cache;
mod keys;

pub use flag_cache::FlagCache;
pub use keys::{fanout, refresh_channels, CacheKey};
