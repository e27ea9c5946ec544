//! Anonymous viewer ids in Redis.
//!
//! A browser without a logged-in user still counts as a viewer. Its identity
//! is a minted `anon-{millis}-{rand}` id, stored per `(device key, target)`
//! so reloading the same page reuses the id instead of inflating the count.
//! The ids are advisory only and carry no authorization weight.

use crate::pool::{RedisPool, RedisResult};
use forum_core::value_objects::{Target, ANON_PREFIX};
use rand::Rng;

/// Key prefix for anonymous session ids
const ANON_SESSION_PREFIX: &str = "anon:";

/// How many TTL windows a minted id stays reusable for.
///
/// Long enough that idle-then-active browsing keeps one identity, short
/// enough that abandoned ids drain away.
const REUSE_FACTOR: u64 = 30;

/// Length of the random suffix in a minted id
const RAND_LEN: usize = 7;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Store for per-browser anonymous viewer ids
#[derive(Clone)]
pub struct AnonymousSessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl AnonymousSessionStore {
    /// Create a store; `presence_ttl_seconds` is the presence expiry window
    #[must_use]
    pub fn new(pool: RedisPool, presence_ttl_seconds: u64) -> Self {
        Self {
            pool,
            ttl_seconds: presence_ttl_seconds * REUSE_FACTOR,
        }
    }

    /// Redis key for a `(device key, target)` pair
    fn key(device_key: &str, target: Target) -> String {
        format!("{ANON_SESSION_PREFIX}{device_key}:{target}")
    }

    /// Mint a fresh anonymous id
    #[must_use]
    pub fn mint_id() -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RAND_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        format!("{ANON_PREFIX}{millis}-{suffix}")
    }

    /// Return the stored id for this `(device key, target)`, minting and
    /// persisting a new one when absent. Every call refreshes the TTL.
    pub async fn get_or_create(&self, device_key: &str, target: Target) -> RedisResult<String> {
        let key = Self::key(device_key, target);

        if let Some(existing) = self.pool.get_value::<String>(&key).await? {
            self.pool.expire(&key, self.ttl_seconds).await?;
            return Ok(existing);
        }

        let id = Self::mint_id();
        self.pool.set(&key, &id, Some(self.ttl_seconds)).await?;

        tracing::debug!(target = %target, "Minted anonymous viewer id");

        Ok(id)
    }

    /// Drop a stored id (used when a browser logs in)
    pub async fn forget(&self, device_key: &str, target: Target) -> RedisResult<bool> {
        self.pool.delete(&Self::key(device_key, target)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::value_objects::SubjectId;
    use uuid::Uuid;

    #[test]
    fn test_minted_id_shape() {
        let id = AnonymousSessionStore::mint_id();
        assert!(id.starts_with(ANON_PREFIX));

        let rest = id.strip_prefix(ANON_PREFIX).unwrap();
        let (millis, suffix) = rest.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), RAND_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_minted_id_parses_as_anonymous_subject() {
        let id = AnonymousSessionStore::mint_id();
        let subject = SubjectId::parse(&id).unwrap();
        assert!(subject.is_anonymous());
    }

    #[test]
    fn test_key_is_per_device_and_target() {
        let target = Target::topic(Uuid::nil());
        let key = AnonymousSessionStore::key("device-a", target);
        assert_eq!(key, format!("anon:device-a:topic:{}", Uuid::nil()));
        assert_ne!(key, AnonymousSessionStore::key("device-b", target));
    }
}
