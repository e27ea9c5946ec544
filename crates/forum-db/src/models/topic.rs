//! Topic database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the topics table
#[derive(Debug, Clone, FromRow)]
pub struct TopicModel {
    pub id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub subforum_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub reply_count: i64,
    pub last_post_number: i64,
    pub last_post_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TopicModel {
    /// Check if topic has any posts at all
    #[inline]
    pub fn has_posts(&self) -> bool {
        self.last_post_number > 0
    }
}

/// Row shape for forum-wide topic/post totals
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TopicTotalsRow {
    pub topics: i64,
    pub posts: i64,
}
