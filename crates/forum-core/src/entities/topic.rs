//! Topic entity and its ancestry chain.
//!
//! Topics are owned by the forum content subsystem; the tracker references
//! them for unread computation and invalidation fan-out. A topic lives in a
//! subcategory XOR a subforum, and its posts carry a monotonically
//! increasing `post_number` used as the read-pointer baseline.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Forum topic (referenced, not owned)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: Uuid,
    /// Set when the topic lives directly in a subcategory
    pub subcategory_id: Option<Uuid>,
    /// Set when the topic lives in a subforum instead
    pub subforum_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    /// Denormalized reply count, maintained by the post subsystem
    pub reply_count: i64,
    /// Highest post_number in the topic; 0 means no posts yet
    pub last_post_number: i64,
    pub last_post_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Topic {
    /// Check the subcategory-XOR-subforum placement invariant
    #[inline]
    pub fn placement_is_valid(&self) -> bool {
        self.subcategory_id.is_some() != self.subforum_id.is_some()
    }

    /// Check if the topic has any posts at all
    #[inline]
    pub fn has_posts(&self) -> bool {
        self.last_post_number > 0
    }

    /// The ancestor chain used for invalidation fan-out
    #[must_use]
    pub fn ancestry(&self) -> TopicAncestry {
        TopicAncestry {
            topic_id: self.id,
            subcategory_id: self.subcategory_id,
            subforum_id: self.subforum_id,
        }
    }
}

/// Ancestor chain of a topic, derivable from its stored placement alone.
///
/// Holds everything the invalidation fan-out needs without further queries:
/// the topic itself plus the subcategory and/or subforum it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicAncestry {
    pub topic_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub subforum_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(subcategory: Option<Uuid>, subforum: Option<Uuid>) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            subcategory_id: subcategory,
            subforum_id: subforum,
            title: "Winter Tactics".to_string(),
            slug: "winter-tactics".to_string(),
            reply_count: 4,
            last_post_number: 5,
            last_post_at: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_placement_xor() {
        assert!(topic(Some(Uuid::new_v4()), None).placement_is_valid());
        assert!(topic(None, Some(Uuid::new_v4())).placement_is_valid());
        assert!(!topic(None, None).placement_is_valid());
        assert!(!topic(Some(Uuid::new_v4()), Some(Uuid::new_v4())).placement_is_valid());
    }

    #[test]
    fn test_ancestry_carries_placement() {
        let sub = Uuid::new_v4();
        let t = topic(Some(sub), None);
        let chain = t.ancestry();
        assert_eq!(chain.topic_id, t.id);
        assert_eq!(chain.subcategory_id, Some(sub));
        assert_eq!(chain.subforum_id, None);
    }
}
