//! Forum statistics in Redis.
//!
//! Forum totals are cached with a short TTL and dropped by the invalidation
//! fan-out. The concurrent-viewers record is a plain high-water mark kept
//! without expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::invalidation::CacheKey;
use crate::pool::{RedisPool, RedisResult};

/// Key for the concurrent-viewers record
const VIEWERS_RECORD_KEY: &str = "stats:viewers_record";

/// Historical maximum of concurrent viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewersRecord {
    pub count: i64,
    pub recorded_at: DateTime<Utc>,
}

/// Store for cached totals and the viewers record
#[derive(Clone)]
pub struct StatsStore {
    pool: RedisPool,
    totals_ttl_seconds: u64,
}

impl StatsStore {
    /// Create a store; totals expire after `totals_ttl_seconds` even if no
    /// invalidation arrives
    #[must_use]
    pub fn new(pool: RedisPool, totals_ttl_seconds: u64) -> Self {
        Self {
            pool,
            totals_ttl_seconds,
        }
    }

    /// Cached forum totals, if fresh
    pub async fn get_totals<V: serde::de::DeserializeOwned>(&self) -> RedisResult<Option<V>> {
        self.pool.get_value(&CacheKey::ForumStats.name()).await
    }

    /// Cache forum totals
    pub async fn set_totals<V: serde::Serialize>(&self, totals: &V) -> RedisResult<()> {
        self.pool
            .set(
                &CacheKey::ForumStats.name(),
                totals,
                Some(self.totals_ttl_seconds),
            )
            .await
    }

    /// Drop the cached totals (invalidation fan-out)
    pub async fn invalidate_totals(&self) -> RedisResult<bool> {
        self.pool.delete(&CacheKey::ForumStats.name()).await
    }

    /// Raise the concurrent-viewers record if `count` beats it.
    ///
    /// Read-compare-write without a lock; a lost race between two instances
    /// costs at most one observation of an already-similar count.
    pub async fn record_viewers(&self, count: i64) -> RedisResult<Option<ViewersRecord>> {
        let current = self.get_viewers_record().await?;

        if current.is_some_and(|record| record.count >= count) {
            return Ok(None);
        }

        let record = ViewersRecord {
            count,
            recorded_at: Utc::now(),
        };
        self.pool.set(VIEWERS_RECORD_KEY, &record, None).await?;

        tracing::info!(count = count, "New concurrent-viewers record");

        Ok(Some(record))
    }

    /// The historical concurrent-viewers record
    pub async fn get_viewers_record(&self) -> RedisResult<Option<ViewersRecord>> {
        self.pool.get_value(VIEWERS_RECORD_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewers_record_serde() {
        let record = ViewersRecord {
            count: 412,
            recorded_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: ViewersRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
