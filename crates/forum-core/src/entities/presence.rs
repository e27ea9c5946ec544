//! Presence record - "subject X is viewing target Y".

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::value_objects::{SubjectId, Target};

/// A live-viewing record with a sliding expiry window.
///
/// At most one record exists per `(subject, target)`; concurrent tabs for
/// the same subject collapse into it through the upsert contract. A record
/// is live while `now - last_seen_at` stays under the expiry window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub id: Uuid,
    pub subject: SubjectId,
    pub target: Target,
    pub joined_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl PresenceRecord {
    /// Create a fresh record for a first join
    #[must_use]
    pub fn new(subject: SubjectId, target: Target) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subject,
            target,
            joined_at: now,
            last_seen_at: now,
        }
    }

    /// Check liveness against the expiry window
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>, ttl_seconds: u64) -> bool {
        now - self.last_seen_at < Duration::seconds(ttl_seconds as i64)
    }

    /// Refresh the sliding window (heartbeat)
    pub fn touch(&mut self) {
        self.last_seen_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_record_is_live() {
        let record = PresenceRecord::new(
            SubjectId::Anonymous("anon-1-abc".to_string()),
            Target::topic(Uuid::new_v4()),
        );
        assert!(record.is_live(Utc::now(), 120));
    }

    #[test]
    fn test_stale_record_is_not_live() {
        let mut record = PresenceRecord::new(
            SubjectId::User(Uuid::new_v4()),
            Target::topic(Uuid::new_v4()),
        );
        record.last_seen_at = Utc::now() - Duration::seconds(121);
        assert!(!record.is_live(Utc::now(), 120));
    }

    #[test]
    fn test_touch_revives() {
        let mut record = PresenceRecord::new(
            SubjectId::User(Uuid::new_v4()),
            Target::subforum(Uuid::new_v4()),
        );
        record.last_seen_at = Utc::now() - Duration::seconds(300);
        assert!(!record.is_live(Utc::now(), 120));
        record.touch();
        assert!(record.is_live(Utc::now(), 120));
    }
}
