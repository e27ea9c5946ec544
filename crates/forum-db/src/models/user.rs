//! Forum user database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the users table (display metadata only; identity is
/// owned by the external provider)
#[derive(Debug, Clone, FromRow)]
pub struct ForumUserModel {
    pub id: Uuid,
    pub username: String,
    pub rank: String,
    pub avatar_url: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
}
