//! Forum user - display metadata for enriching viewer lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Forum user profile, referenced by the presence tracker when listing
/// authenticated viewers. Identity itself is owned by the external provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumUser {
    pub id: Uuid,
    pub username: String,
    /// Community rank/role label (e.g. "pescar", "moderator")
    pub rank: String,
    pub avatar_url: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
}
