//! Redis Pub/Sub publisher.
//!
//! Publishes domain events and refresh notices. Publishing is fire-and-forget
//! from the services' point of view: a failed publish is logged by the caller
//! and never fails the triggering request.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use forum_core::events::ForumEvent;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

/// Envelope for refresh notices on target/user channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Notice type name (e.g., "VIEWERS_CHANGED", "UNREAD_CHANGED")
    pub event_type: String,
    /// Notice payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Create a new notice
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish a notice to a channel
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published notice"
        );

        Ok(receivers)
    }

    /// Publish the same notice to multiple channels
    pub async fn publish_many(
        &self,
        channels: &[PubSubChannel],
        event: &PubSubEvent,
    ) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let channel_name = channel.name();
            let receivers: u32 = conn.publish(&channel_name, &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %event.event_type,
            total_receivers = total_receivers,
            "Published notice to multiple channels"
        );

        Ok(total_receivers)
    }

    /// Publish a domain event to the event feed.
    ///
    /// Every instance's invalidation loop receives it, including this one.
    pub async fn publish_forum_event(&self, event: &ForumEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let payload = serde_json::to_string(event)?;

        let receivers: u32 = conn.publish(crate::pubsub::EVENTS_CHANNEL, &payload).await?;

        tracing::debug!(
            event = event.name(),
            topic_id = %event.topic_id(),
            receivers = receivers,
            "Published domain event"
        );

        Ok(receivers)
    }

    /// Publish a viewers-changed notice for a target
    pub async fn publish_viewers_changed(
        &self,
        target: forum_core::value_objects::Target,
    ) -> RedisResult<u32> {
        let event = PubSubEvent::new(
            "VIEWERS_CHANGED",
            serde_json::json!({
                "target_type": target.target_type,
                "target_id": target.target_id,
            }),
        );
        self.publish(&PubSubChannel::target(target), &event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::entities::TopicAncestry;
    use uuid::Uuid;

    #[test]
    fn test_notice_creation() {
        let data = serde_json::json!({"target_id": "00000000-0000-0000-0000-000000000000"});
        let event = PubSubEvent::new("VIEWERS_CHANGED", data.clone());
        assert_eq!(event.event_type, "VIEWERS_CHANGED");
        assert_eq!(event.data, data);
    }

    #[test]
    fn test_notice_serialization() {
        let event = PubSubEvent::new("UNREAD_CHANGED", serde_json::json!({}));
        let json = event.to_json().unwrap();
        assert!(json.contains("UNREAD_CHANGED"));
    }

    #[test]
    fn test_forum_event_payload_is_tagged() {
        let event = ForumEvent::post_created(
            TopicAncestry {
                topic_id: Uuid::nil(),
                subcategory_id: None,
                subforum_id: None,
            },
            3,
        );
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("POST_CREATED"));
    }
}
