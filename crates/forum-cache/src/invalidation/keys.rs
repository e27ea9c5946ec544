//! Typed cache keys and the event fan-out that invalidates them.

use forum_core::events::ForumEvent;
use forum_core::value_objects::Target;
use uuid::Uuid;

use crate::pubsub::PubSubChannel;

/// A cache key derived from entity type and id, optionally scoped to a user.
///
/// `user_id: None` on an unread key means "every user's copy" and is only
/// meaningful for invalidation, where it matches all user-scoped entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Unread flag for one topic
    TopicUnread {
        topic_id: Uuid,
        user_id: Option<Uuid>,
    },
    /// Batched unread flags for the topics listed under a holder
    TopicUnreadBatch {
        holder: Target,
        user_id: Option<Uuid>,
    },
    /// Aggregate unread flag for a subcategory (spans its subforums)
    SubcategoryUnread {
        subcategory_id: Uuid,
        user_id: Option<Uuid>,
    },
    /// Batched subcategory flags (homepage)
    SubcategoryUnreadBatch { user_id: Option<Uuid> },
    /// Aggregate unread flag for a subforum
    SubforumUnread {
        subforum_id: Uuid,
        user_id: Option<Uuid>,
    },
    /// Batched subforum flags shown on a subcategory page
    SubforumUnreadBatch {
        subcategory_id: Uuid,
        user_id: Option<Uuid>,
    },
    /// Topic listing for a subcategory or subforum page
    TopicListing { holder: Target },
    /// Viewer list for a target
    Viewers { target: Target },
    /// Forum-wide totals
    ForumStats,
    /// Homepage hierarchy tree
    HomeHierarchy,
}

impl CacheKey {
    /// User scope of this key, if the variant carries one
    fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::TopicUnread { user_id, .. }
            | Self::TopicUnreadBatch { user_id, .. }
            | Self::SubcategoryUnread { user_id, .. }
            | Self::SubcategoryUnreadBatch { user_id }
            | Self::SubforumUnread { user_id, .. }
            | Self::SubforumUnreadBatch { user_id, .. } => *user_id,
            Self::TopicListing { .. } | Self::Viewers { .. } | Self::ForumStats | Self::HomeHierarchy => {
                None
            }
        }
    }

    /// Whether the variant is user-scoped at all
    fn is_user_scoped(&self) -> bool {
        !matches!(
            self,
            Self::TopicListing { .. } | Self::Viewers { .. } | Self::ForumStats | Self::HomeHierarchy
        )
    }

    /// Key string without the user scope
    fn base(&self) -> String {
        match self {
            Self::TopicUnread { topic_id, .. } => format!("unread:topic:{topic_id}"),
            Self::TopicUnreadBatch { holder, .. } => {
                format!("unread:batch:{}:{}", holder.target_type, holder.target_id)
            }
            Self::SubcategoryUnread { subcategory_id, .. } => {
                format!("unread:subcategory:{subcategory_id}")
            }
            Self::SubcategoryUnreadBatch { .. } => "unread:batch:subcategories".to_string(),
            Self::SubforumUnread { subforum_id, .. } => format!("unread:subforum:{subforum_id}"),
            Self::SubforumUnreadBatch { subcategory_id, .. } => {
                format!("unread:batch:subforums:{subcategory_id}")
            }
            Self::TopicListing { holder } => {
                format!("topics:{}:{}", holder.target_type, holder.target_id)
            }
            Self::Viewers { target } => {
                format!("viewers:{}:{}", target.target_type, target.target_id)
            }
            Self::ForumStats => "stats:forum".to_string(),
            Self::HomeHierarchy => "hierarchy:home".to_string(),
        }
    }

    /// Full key string. User-scoped keys carry a `:u:{uuid}` suffix.
    #[must_use]
    pub fn name(&self) -> String {
        match self.user_id() {
            Some(user_id) => format!("{}:u:{user_id}", self.base()),
            None => self.base(),
        }
    }

    /// Whether a stored key name is invalidated by this key.
    ///
    /// A user-scoped key with `user_id: None` matches every user's entry for
    /// the same base.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        if self.is_user_scoped() && self.user_id().is_none() {
            let base = self.base();
            stored == base || stored.starts_with(&format!("{base}:u:"))
        } else {
            stored == self.name()
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Direct holder of the topic in an event's ancestry: the subforum when one
/// is present, otherwise the subcategory.
fn direct_holder(subcategory_id: Option<Uuid>, subforum_id: Option<Uuid>) -> Option<Target> {
    subforum_id
        .map(Target::subforum)
        .or(subcategory_id.map(Target::subcategory))
}

/// Compute the cache keys an event invalidates.
///
/// Derived purely from the ancestry the event carries. Keys for unrelated
/// siblings are never produced. Marker writes invalidate only the writing
/// user's entries; content events invalidate every user's copy.
#[must_use]
pub fn fanout(event: &ForumEvent) -> Vec<CacheKey> {
    let mut keys = Vec::new();

    match *event {
        ForumEvent::PostCreated {
            topic_id,
            subcategory_id,
            subforum_id,
            ..
        } => {
            keys.push(CacheKey::TopicUnread {
                topic_id,
                user_id: None,
            });
            push_holder_keys(&mut keys, subcategory_id, subforum_id, None);
            keys.push(CacheKey::ForumStats);
            keys.push(CacheKey::HomeHierarchy);
        }
        ForumEvent::TopicCreated {
            subcategory_id,
            subforum_id,
            ..
        } => {
            push_holder_keys(&mut keys, subcategory_id, subforum_id, None);
            keys.push(CacheKey::ForumStats);
            keys.push(CacheKey::HomeHierarchy);
        }
        ForumEvent::MarkerWritten {
            user_id,
            topic_id,
            subcategory_id,
            subforum_id,
        } => {
            keys.push(CacheKey::TopicUnread {
                topic_id,
                user_id: Some(user_id),
            });
            push_holder_keys(&mut keys, subcategory_id, subforum_id, Some(user_id));
        }
    }

    keys
}

/// Aggregate and listing keys for the topic's holders
fn push_holder_keys(
    keys: &mut Vec<CacheKey>,
    subcategory_id: Option<Uuid>,
    subforum_id: Option<Uuid>,
    user_id: Option<Uuid>,
) {
    if let Some(holder) = direct_holder(subcategory_id, subforum_id) {
        keys.push(CacheKey::TopicUnreadBatch { holder, user_id });
        // Listings only change with content, not with per-user markers
        if user_id.is_none() {
            keys.push(CacheKey::TopicListing { holder });
        }
    }

    if let Some(subforum_id) = subforum_id {
        keys.push(CacheKey::SubforumUnread {
            subforum_id,
            user_id,
        });
        if let Some(subcategory_id) = subcategory_id {
            keys.push(CacheKey::SubforumUnreadBatch {
                subcategory_id,
                user_id,
            });
        }
    }

    if let Some(subcategory_id) = subcategory_id {
        keys.push(CacheKey::SubcategoryUnread {
            subcategory_id,
            user_id,
        });
        keys.push(CacheKey::SubcategoryUnreadBatch { user_id });
    }
}

/// Pub/sub channels that receive a refresh notice for an event.
///
/// Content events notify everyone viewing the topic or one of its holders;
/// marker writes notify only the writing user's own tabs.
#[must_use]
pub fn refresh_channels(event: &ForumEvent) -> Vec<PubSubChannel> {
    match *event {
        ForumEvent::PostCreated {
            topic_id,
            subcategory_id,
            subforum_id,
            ..
        }
        | ForumEvent::TopicCreated {
            topic_id,
            subcategory_id,
            subforum_id,
        } => {
            let mut channels = vec![PubSubChannel::target(Target::topic(topic_id))];
            if let Some(id) = subforum_id {
                channels.push(PubSubChannel::target(Target::subforum(id)));
            }
            if let Some(id) = subcategory_id {
                channels.push(PubSubChannel::target(Target::subcategory(id)));
            }
            channels
        }
        ForumEvent::MarkerWritten { user_id, .. } => vec![PubSubChannel::user(user_id)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_core::entities::TopicAncestry;

    fn ancestry(subcategory: Option<Uuid>, subforum: Option<Uuid>) -> TopicAncestry {
        TopicAncestry {
            topic_id: Uuid::new_v4(),
            subcategory_id: subcategory,
            subforum_id: subforum,
        }
    }

    #[test]
    fn test_post_in_subcategory_invalidates_its_chain() {
        let subcategory = Uuid::new_v4();
        let chain = ancestry(Some(subcategory), None);
        let keys = fanout(&ForumEvent::post_created(chain, 3));

        assert!(keys.contains(&CacheKey::TopicUnread {
            topic_id: chain.topic_id,
            user_id: None
        }));
        assert!(keys.contains(&CacheKey::SubcategoryUnread {
            subcategory_id: subcategory,
            user_id: None
        }));
        assert!(keys.contains(&CacheKey::TopicListing {
            holder: Target::subcategory(subcategory)
        }));
        assert!(keys.contains(&CacheKey::ForumStats));
        assert!(keys.contains(&CacheKey::HomeHierarchy));
    }

    #[test]
    fn test_post_in_subforum_reaches_parent_subcategory() {
        let subcategory = Uuid::new_v4();
        let subforum = Uuid::new_v4();
        let chain = ancestry(Some(subcategory), Some(subforum));
        let keys = fanout(&ForumEvent::post_created(chain, 1));

        // The listing that changed is the subforum's, not the subcategory's
        assert!(keys.contains(&CacheKey::TopicListing {
            holder: Target::subforum(subforum)
        }));
        assert!(!keys.contains(&CacheKey::TopicListing {
            holder: Target::subcategory(subcategory)
        }));
        // Both aggregate flags are stale
        assert!(keys.contains(&CacheKey::SubforumUnread {
            subforum_id: subforum,
            user_id: None
        }));
        assert!(keys.contains(&CacheKey::SubcategoryUnread {
            subcategory_id: subcategory,
            user_id: None
        }));
    }

    #[test]
    fn test_sibling_subcategories_are_isolated() {
        let mine = Uuid::new_v4();
        let sibling = Uuid::new_v4();
        let keys = fanout(&ForumEvent::post_created(ancestry(Some(mine), None), 1));

        let sibling_key = CacheKey::SubcategoryUnread {
            subcategory_id: sibling,
            user_id: None,
        };
        assert!(!keys.contains(&sibling_key));
        assert!(!keys
            .iter()
            .any(|k| k.name().contains(&sibling.to_string())));
    }

    #[test]
    fn test_marker_write_stays_user_scoped_and_local() {
        let user = Uuid::new_v4();
        let chain = ancestry(Some(Uuid::new_v4()), None);
        let keys = fanout(&ForumEvent::marker_written(user, chain));

        assert!(!keys.contains(&CacheKey::ForumStats));
        assert!(!keys.contains(&CacheKey::HomeHierarchy));
        for key in &keys {
            assert!(key.name().ends_with(&format!(":u:{user}")), "key {key} not user-scoped");
        }
    }

    #[test]
    fn test_unscoped_key_matches_every_user_entry() {
        let topic = Uuid::new_v4();
        let user = Uuid::new_v4();
        let all = CacheKey::TopicUnread {
            topic_id: topic,
            user_id: None,
        };
        let one = CacheKey::TopicUnread {
            topic_id: topic,
            user_id: Some(user),
        };

        assert!(all.matches(&one.name()));
        assert!(all.matches(&all.name()));
        assert!(one.matches(&one.name()));
        assert!(!one.matches(&all.name()));

        let other = CacheKey::TopicUnread {
            topic_id: Uuid::new_v4(),
            user_id: Some(user),
        };
        assert!(!all.matches(&other.name()));
    }

    #[test]
    fn test_refresh_channels_for_marker_go_to_the_user() {
        let user = Uuid::new_v4();
        let channels = refresh_channels(&ForumEvent::marker_written(
            user,
            ancestry(Some(Uuid::new_v4()), None),
        ));
        assert_eq!(channels, vec![PubSubChannel::user(user)]);
    }

    #[test]
    fn test_refresh_channels_for_post_cover_topic_and_holders() {
        let subcategory = Uuid::new_v4();
        let chain = ancestry(Some(subcategory), None);
        let channels = refresh_channels(&ForumEvent::post_created(chain, 2));

        assert!(channels.contains(&PubSubChannel::target(Target::topic(chain.topic_id))));
        assert!(channels.contains(&PubSubChannel::target(Target::subcategory(subcategory))));
    }
}
