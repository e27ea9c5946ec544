//! Invalidation fan-out
//!
//! Applies the cache-key fan-out of a domain event to this instance's flag
//! cache and the Redis stats cache, then pushes refresh notices to the
//! affected channels. Events arrive either from local writes or from the
//! `forum:events` feed the subscriber task listens on.

use tracing::{debug, instrument, warn};
use uuid::Uuid;

use forum_cache::{fanout, refresh_channels, CacheKey, PubSubEvent};
use forum_core::events::ForumEvent;

use super::context::ServiceContext;

/// Invalidation service
pub struct InvalidationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InvalidationService<'a> {
    /// Create a new InvalidationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle an event produced on this instance: invalidate locally, then
    /// feed every other instance. Runs after the triggering write committed.
    #[instrument(skip(self), fields(event = event.name()))]
    pub async fn dispatch(&self, event: &ForumEvent) {
        let event = self.complete_ancestry(event).await;
        self.apply_completed(&event).await;

        if let Err(e) = self.ctx.publisher().publish_forum_event(&event).await {
            warn!(error = %e, "Event publish failed; other instances repair via flag TTL");
        }
    }

    /// Handle an event received from the feed
    #[instrument(skip(self), fields(event = event.name()))]
    pub async fn handle_event(&self, event: &ForumEvent) {
        let event = self.complete_ancestry(event).await;
        self.apply_completed(&event).await;
    }

    async fn apply_completed(&self, event: &ForumEvent) {
        let keys = fanout(event);
        let dropped = self.ctx.flag_cache().invalidate_all(&keys);
        debug!(keys = keys.len(), dropped = dropped, "Applied invalidation fan-out");

        if keys.contains(&CacheKey::ForumStats) {
            if let Err(e) = self.ctx.stats_store().invalidate_totals().await {
                warn!(error = %e, "Stats invalidation failed; totals expire on their TTL");
            }
        }

        let channels = refresh_channels(event);
        if channels.is_empty() {
            return;
        }
        let notice = PubSubEvent::new(
            notice_type(event),
            serde_json::json!({ "topic_id": event.topic_id() }),
        );
        if let Err(e) = self.ctx.publisher().publish_many(&channels, &notice).await {
            warn!(error = %e, "Refresh notice publish failed");
        }
    }

    /// Fill in a subforum's parent subcategory when the event was built from
    /// a topic's stored placement alone.
    ///
    /// The aggregate fan-out needs the whole chain; a failed lookup leaves
    /// the event as-is and the missing keys age out on the flag TTL.
    async fn complete_ancestry(&self, event: &ForumEvent) -> ForumEvent {
        let (subcategory_id, subforum_id) = match *event {
            ForumEvent::PostCreated {
                subcategory_id,
                subforum_id,
                ..
            }
            | ForumEvent::TopicCreated {
                subcategory_id,
                subforum_id,
                ..
            }
            | ForumEvent::MarkerWritten {
                subcategory_id,
                subforum_id,
                ..
            } => (subcategory_id, subforum_id),
        };

        let Some(subforum_id) = subforum_id else {
            return event.clone();
        };
        if subcategory_id.is_some() {
            return event.clone();
        }

        match self.parent_subcategory(subforum_id).await {
            Some(parent) => with_subcategory(event, parent),
            None => event.clone(),
        }
    }

    async fn parent_subcategory(&self, subforum_id: Uuid) -> Option<Uuid> {
        match self
            .ctx
            .hierarchy_repo()
            .find_subforum_by_id(subforum_id)
            .await
        {
            Ok(Some(subforum)) => Some(subforum.subcategory_id),
            Ok(None) => {
                warn!(subforum_id = %subforum_id, "Event references unknown subforum");
                None
            }
            Err(e) => {
                warn!(subforum_id = %subforum_id, error = %e, "Parent subcategory lookup failed");
                None
            }
        }
    }
}

/// Notice type watchers receive for an event
fn notice_type(event: &ForumEvent) -> &'static str {
    match event {
        ForumEvent::MarkerWritten { .. } => "UNREAD_CHANGED",
        ForumEvent::PostCreated { .. } | ForumEvent::TopicCreated { .. } => "CONTENT_CHANGED",
    }
}

/// Copy of `event` with the subcategory filled in
fn with_subcategory(event: &ForumEvent, subcategory_id: Uuid) -> ForumEvent {
    match *event {
        ForumEvent::PostCreated {
            topic_id,
            subforum_id,
            post_number,
            ..
        } => ForumEvent::PostCreated {
            topic_id,
            subcategory_id: Some(subcategory_id),
            subforum_id,
            post_number,
        },
        ForumEvent::TopicCreated {
            topic_id,
            subforum_id,
            ..
        } => ForumEvent::TopicCreated {
            topic_id,
            subcategory_id: Some(subcategory_id),
            subforum_id,
        },
        ForumEvent::MarkerWritten {
            user_id,
            topic_id,
            subforum_id,
            ..
        } => ForumEvent::MarkerWritten {
            user_id,
            topic_id,
            subcategory_id: Some(subcategory_id),
            subforum_id,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_type_per_event() {
        let marker = ForumEvent::MarkerWritten {
            user_id: Uuid::new_v4(),
            topic_id: Uuid::new_v4(),
            subcategory_id: None,
            subforum_id: None,
        };
        assert_eq!(notice_type(&marker), "UNREAD_CHANGED");

        let post = ForumEvent::PostCreated {
            topic_id: Uuid::new_v4(),
            subcategory_id: Some(Uuid::new_v4()),
            subforum_id: None,
            post_number: 2,
        };
        assert_eq!(notice_type(&post), "CONTENT_CHANGED");
    }

    #[test]
    fn test_with_subcategory_preserves_rest() {
        let topic_id = Uuid::new_v4();
        let subforum_id = Uuid::new_v4();
        let parent = Uuid::new_v4();
        let event = ForumEvent::PostCreated {
            topic_id,
            subcategory_id: None,
            subforum_id: Some(subforum_id),
            post_number: 9,
        };

        let completed = with_subcategory(&event, parent);
        assert_eq!(
            completed,
            ForumEvent::PostCreated {
                topic_id,
                subcategory_id: Some(parent),
                subforum_id: Some(subforum_id),
                post_number: 9,
            }
        );
    }
}
