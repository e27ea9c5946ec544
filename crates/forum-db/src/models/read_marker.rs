//! Read marker database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the read_markers table
#[derive(Debug, Clone, FromRow)]
pub struct ReadMarkerModel {
    pub user_id: Uuid,
    pub topic_id: Uuid,
    pub last_read_post_number: i64,
    pub last_read_at: DateTime<Utc>,
}

/// Row shape for batch unread queries: one flag per requested id
#[derive(Debug, Clone, Copy, FromRow)]
pub struct UnreadFlagRow {
    pub id: Uuid,
    pub has_unread: bool,
}
