//! In-process cache for computed unread flags.
//!
//! Each API instance memoizes flag lookups here; coherence across instances
//! comes from the event feed, whose fan-out removes matching entries on every
//! instance. Entries also age out after a TTL so a missed event is repaired
//! by the next poll.

use dashmap::DashMap;
use std::time::{Duration, Instant};

use super::CacheKey;

#[derive(Debug, Clone, Copy)]
struct CachedFlag {
    value: bool,
    cached_at: Instant,
}

/// Concurrent flag cache keyed by `CacheKey` names
pub struct FlagCache {
    entries: DashMap<String, CachedFlag>,
    ttl: Duration,
}

impl FlagCache {
    /// Create a cache whose entries expire after `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Look up a flag; expired entries are dropped on read
    pub fn get(&self, key: &CacheKey) -> Option<bool> {
        let name = key.name();
        let entry = self.entries.get(&name)?;

        if entry.cached_at.elapsed() < self.ttl {
            Some(entry.value)
        } else {
            drop(entry);
            self.entries.remove(&name);
            None
        }
    }

    /// Store a flag
    pub fn put(&self, key: &CacheKey, value: bool) {
        self.entries.insert(
            key.name(),
            CachedFlag {
                value,
                cached_at: Instant::now(),
            },
        );
    }

    /// Remove every entry the key matches; returns how many were dropped
    pub fn invalidate(&self, key: &CacheKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|name, _| !key.matches(name));
        before - self.entries.len()
    }

    /// Apply a whole fan-out
    pub fn invalidate_all(&self, keys: &[CacheKey]) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|name, _| !keys.iter().any(|key| key.matches(name)));
        before - self.entries.len()
    }

    /// Drop expired entries (periodic sweep)
    pub fn sweep(&self) {
        self.entries
            .retain(|_, flag| flag.cached_at.elapsed() < self.ttl);
    }

    /// Number of live entries (expired ones included until swept)
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn topic_key(topic_id: Uuid, user_id: Uuid) -> CacheKey {
        CacheKey::TopicUnread {
            topic_id,
            user_id: Some(user_id),
        }
    }

    #[test]
    fn test_put_get() {
        let cache = FlagCache::new(Duration::from_secs(30));
        let key = topic_key(Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(cache.get(&key), None);
        cache.put(&key, true);
        assert_eq!(cache.get(&key), Some(true));
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = FlagCache::new(Duration::ZERO);
        let key = topic_key(Uuid::new_v4(), Uuid::new_v4());

        cache.put(&key, true);
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unscoped_invalidation_hits_all_users() {
        let cache = FlagCache::new(Duration::from_secs(30));
        let topic = Uuid::new_v4();
        let first = topic_key(topic, Uuid::new_v4());
        let second = topic_key(topic, Uuid::new_v4());
        let unrelated = topic_key(Uuid::new_v4(), Uuid::new_v4());

        cache.put(&first, true);
        cache.put(&second, false);
        cache.put(&unrelated, true);

        let dropped = cache.invalidate(&CacheKey::TopicUnread {
            topic_id: topic,
            user_id: None,
        });

        assert_eq!(dropped, 2);
        assert_eq!(cache.get(&first), None);
        assert_eq!(cache.get(&second), None);
        assert_eq!(cache.get(&unrelated), Some(true));
    }

    #[test]
    fn test_user_scoped_invalidation_spares_others() {
        let cache = FlagCache::new(Duration::from_secs(30));
        let topic = Uuid::new_v4();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        cache.put(&topic_key(topic, me), true);
        cache.put(&topic_key(topic, other), true);

        cache.invalidate(&topic_key(topic, me));

        assert_eq!(cache.get(&topic_key(topic, me)), None);
        assert_eq!(cache.get(&topic_key(topic, other)), Some(true));
    }
}
