//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub.

use forum_core::value_objects::{Target, TargetType};
use uuid::Uuid;

/// Channel prefix for target-scoped refresh notices
pub const TARGET_CHANNEL_PREFIX: &str = "target:";
/// Channel prefix for user-scoped refresh notices
pub const USER_CHANNEL_PREFIX: &str = "user:";
/// Channel carrying domain events for every instance's invalidation loop
pub const EVENTS_CHANNEL: &str = "forum:events";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Refresh notices for everyone viewing a forum target
    Target(Target),
    /// Refresh notices for a specific user (all their tabs)
    User(Uuid),
    /// Domain event feed consumed by the invalidation loop
    Events,
}

impl PubSubChannel {
    /// Create a target channel
    #[must_use]
    pub fn target(target: Target) -> Self {
        Self::Target(target)
    }

    /// Create a user channel
    #[must_use]
    pub fn user(user_id: Uuid) -> Self {
        Self::User(user_id)
    }

    /// Create the domain event channel
    #[must_use]
    pub fn events() -> Self {
        Self::Events
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Target(target) => {
                format!("{TARGET_CHANNEL_PREFIX}{}:{}", target.target_type, target.target_id)
            }
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
            Self::Events => EVENTS_CHANNEL.to_string(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    pub fn parse(name: &str) -> Option<Self> {
        if name == EVENTS_CHANNEL {
            return Some(Self::Events);
        }

        if let Some(rest) = name.strip_prefix(TARGET_CHANNEL_PREFIX) {
            let (type_str, id_str) = rest.split_once(':')?;
            let target_type: TargetType = type_str.parse().ok()?;
            let target_id = Uuid::parse_str(id_str).ok()?;
            return Some(Self::Target(Target::new(target_type, target_id)));
        }

        if let Some(id_str) = name.strip_prefix(USER_CHANNEL_PREFIX) {
            let id = Uuid::parse_str(id_str).ok()?;
            return Some(Self::User(id));
        }

        None
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        let topic_id = Uuid::nil();
        let user_id = Uuid::nil();

        assert_eq!(
            PubSubChannel::target(Target::topic(topic_id)).name(),
            format!("target:topic:{topic_id}")
        );
        assert_eq!(
            PubSubChannel::user(user_id).name(),
            format!("user:{user_id}")
        );
        assert_eq!(PubSubChannel::events().name(), "forum:events");
    }

    #[test]
    fn test_channel_parse_round_trip() {
        let channels = [
            PubSubChannel::target(Target::subforum(Uuid::new_v4())),
            PubSubChannel::user(Uuid::new_v4()),
            PubSubChannel::events(),
        ];

        for channel in channels {
            assert_eq!(PubSubChannel::parse(&channel.name()), Some(channel));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(PubSubChannel::parse("guild:12345"), None);
        assert_eq!(PubSubChannel::parse("target:guild:not-a-uuid"), None);
    }
}
