//! Presence record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the presence_records table.
///
/// `subject_id` stores the string form of the subject: a uuid for
/// authenticated users, an `anon-` prefixed session id otherwise.
#[derive(Debug, Clone, FromRow)]
pub struct PresenceRecordModel {
    pub id: Uuid,
    pub subject_id: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl PresenceRecordModel {
    /// Check if the stored subject is anonymous
    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.subject_id.starts_with(forum_core::value_objects::ANON_PREFIX)
    }
}
