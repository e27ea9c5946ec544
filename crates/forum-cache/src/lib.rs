//! # forum-cache
//!
//! Redis layer for the presence tracker: pub/sub change feed, anonymous
//! session ids, forum statistics, plus the typed cache-key fan-out and the
//! in-process flag cache it invalidates.
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: change-notification feed across server instances
//! - **Sessions**: per-browser anonymous viewer ids with TTL
//! - **Invalidation**: typed cache keys derived from domain events
//! - **Stats**: cached forum totals and the concurrent-viewers record

pub mod invalidation;
pub mod pool;
pub mod pubsub;
pub mod session;
pub mod stats;

// Re-export pool types
pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

// Re-export invalidation types
pub use invalidation::{fanout, refresh_channels, CacheKey, FlagCache};

// Re-export session types
pub use session::AnonymousSessionStore;

// Re-export stats types
pub use stats::{StatsStore, ViewersRecord};

// Re-export pubsub types
pub use pubsub::{
    FeedMessage, PubSubChannel, PubSubEvent, Publisher, Subscriber, SubscriberBuilder,
    SubscriberConfig, SubscriberError, SubscriberResult, EVENTS_CHANNEL, TARGET_CHANNEL_PREFIX,
    USER_CHANNEL_PREFIX,
};
