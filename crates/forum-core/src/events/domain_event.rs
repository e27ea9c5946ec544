//! Domain events - emitted after the triggering write is durably committed.
//!
//! Every event carries the full ancestor chain of the affected topic so the
//! invalidation fan-out can be derived without any further queries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::TopicAncestry;

/// Events that drive cache invalidation and live refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ForumEvent {
    /// A new post was committed in a topic
    PostCreated {
        topic_id: Uuid,
        subcategory_id: Option<Uuid>,
        subforum_id: Option<Uuid>,
        post_number: i64,
    },
    /// A new topic was committed
    TopicCreated {
        topic_id: Uuid,
        subcategory_id: Option<Uuid>,
        subforum_id: Option<Uuid>,
    },
    /// A read marker was written for (user, topic)
    MarkerWritten {
        user_id: Uuid,
        topic_id: Uuid,
        subcategory_id: Option<Uuid>,
        subforum_id: Option<Uuid>,
    },
}

impl ForumEvent {
    /// Build a post-created event from a topic's ancestry
    #[must_use]
    pub fn post_created(ancestry: TopicAncestry, post_number: i64) -> Self {
        Self::PostCreated {
            topic_id: ancestry.topic_id,
            subcategory_id: ancestry.subcategory_id,
            subforum_id: ancestry.subforum_id,
            post_number,
        }
    }

    /// Build a topic-created event from the topic's ancestry
    #[must_use]
    pub fn topic_created(ancestry: TopicAncestry) -> Self {
        Self::TopicCreated {
            topic_id: ancestry.topic_id,
            subcategory_id: ancestry.subcategory_id,
            subforum_id: ancestry.subforum_id,
        }
    }

    /// Build a marker-written event for a user in a topic
    #[must_use]
    pub fn marker_written(user_id: Uuid, ancestry: TopicAncestry) -> Self {
        Self::MarkerWritten {
            user_id,
            topic_id: ancestry.topic_id,
            subcategory_id: ancestry.subcategory_id,
            subforum_id: ancestry.subforum_id,
        }
    }

    /// The topic at the root of this event's ancestry chain
    #[must_use]
    pub fn topic_id(&self) -> Uuid {
        match self {
            Self::PostCreated { topic_id, .. }
            | Self::TopicCreated { topic_id, .. }
            | Self::MarkerWritten { topic_id, .. } => *topic_id,
        }
    }

    /// Event type name for pub/sub payloads and logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PostCreated { .. } => "POST_CREATED",
            Self::TopicCreated { .. } => "TOPIC_CREATED",
            Self::MarkerWritten { .. } => "MARKER_WRITTEN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_ancestry() {
        let ancestry = TopicAncestry {
            topic_id: Uuid::new_v4(),
            subcategory_id: Some(Uuid::new_v4()),
            subforum_id: None,
        };
        let event = ForumEvent::post_created(ancestry, 6);
        assert_eq!(event.topic_id(), ancestry.topic_id);
        assert_eq!(event.name(), "POST_CREATED");
    }

    #[test]
    fn test_serde_tagged_form() {
        let event = ForumEvent::TopicCreated {
            topic_id: Uuid::nil(),
            subcategory_id: None,
            subforum_id: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"TOPIC_CREATED\""));
    }
}
