//! Response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use forum_cache::ViewersRecord;
use forum_core::entities::{Category, ForumUser, PresenceRecord, ReadMarker, Subcategory, Subforum};
use forum_core::value_objects::{Target, TargetType};

// ============================================================================
// Hierarchy
// ============================================================================

/// Category in API responses
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            sort_order: category.sort_order,
        }
    }
}

/// Subcategory in API responses
#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sort_order: i32,
}

impl From<Subcategory> for SubcategoryResponse {
    fn from(subcategory: Subcategory) -> Self {
        Self {
            id: subcategory.id,
            category_id: subcategory.category_id,
            name: subcategory.name,
            slug: subcategory.slug,
            description: subcategory.description,
            sort_order: subcategory.sort_order,
        }
    }
}

/// Subforum in API responses
#[derive(Debug, Clone, Serialize)]
pub struct SubforumResponse {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub sort_order: i32,
}

impl From<Subforum> for SubforumResponse {
    fn from(subforum: Subforum) -> Self {
        Self {
            id: subforum.id,
            subcategory_id: subforum.subcategory_id,
            name: subforum.name,
            slug: subforum.slug,
            description: subforum.description,
            sort_order: subforum.sort_order,
        }
    }
}

/// One step of a root-first breadcrumb chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbResponse {
    pub name: String,
    pub slug: String,
}

impl BreadcrumbResponse {
    fn new(name: &str, slug: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }
}

/// Resolved forum context for a bare slug.
///
/// `kind: None` is the not-found shape; the endpoint still answers 200.
#[derive(Debug, Clone, Serialize)]
pub struct ForumContextResponse {
    pub kind: Option<TargetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<SubcategoryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subforum: Option<SubforumResponse>,
    /// Subcategories of a category context
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<SubcategoryResponse>,
    /// Subforums of a subcategory context
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subforums: Vec<SubforumResponse>,
    pub breadcrumbs: Vec<BreadcrumbResponse>,
}

impl ForumContextResponse {
    /// Context for a slug that matched nothing
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            kind: None,
            category: None,
            subcategory: None,
            subforum: None,
            subcategories: Vec::new(),
            subforums: Vec::new(),
            breadcrumbs: Vec::new(),
        }
    }

    /// Context for a category slug
    #[must_use]
    pub fn category(category: Category, subcategories: Vec<Subcategory>) -> Self {
        Self {
            kind: Some(TargetType::Category),
            breadcrumbs: vec![BreadcrumbResponse::new(&category.name, &category.slug)],
            category: Some(category.into()),
            subcategory: None,
            subforum: None,
            subcategories: subcategories.into_iter().map(Into::into).collect(),
            subforums: Vec::new(),
        }
    }

    /// Context for a subcategory slug
    #[must_use]
    pub fn subcategory(
        category: Category,
        subcategory: Subcategory,
        subforums: Vec<Subforum>,
    ) -> Self {
        Self {
            kind: Some(TargetType::Subcategory),
            breadcrumbs: vec![
                BreadcrumbResponse::new(&category.name, &category.slug),
                BreadcrumbResponse::new(&subcategory.name, &subcategory.slug),
            ],
            category: Some(category.into()),
            subcategory: Some(subcategory.into()),
            subforum: None,
            subcategories: Vec::new(),
            subforums: subforums.into_iter().map(Into::into).collect(),
        }
    }

    /// Context for a subforum slug
    #[must_use]
    pub fn subforum(category: Category, subcategory: Subcategory, subforum: Subforum) -> Self {
        Self {
            kind: Some(TargetType::Subforum),
            breadcrumbs: vec![
                BreadcrumbResponse::new(&category.name, &category.slug),
                BreadcrumbResponse::new(&subcategory.name, &subcategory.slug),
                BreadcrumbResponse::new(&subforum.name, &subforum.slug),
            ],
            category: Some(category.into()),
            subcategory: Some(subcategory.into()),
            subforum: Some(subforum.into()),
            subcategories: Vec::new(),
            subforums: Vec::new(),
        }
    }
}

// ============================================================================
// Presence
// ============================================================================

/// Session handle returned when a viewer joins a target
#[derive(Debug, Clone, Serialize)]
pub struct PresenceSessionResponse {
    pub record_id: Uuid,
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    /// Interval the client should heartbeat at, in seconds
    pub heartbeat_seconds: u64,
    /// Sliding expiry window, in seconds
    pub ttl_seconds: u64,
}

impl PresenceSessionResponse {
    #[must_use]
    pub fn new(record: PresenceRecord, heartbeat_seconds: u64, ttl_seconds: u64) -> Self {
        Self {
            record_id: record.id,
            target_type: record.target.target_type,
            target_id: record.target.target_id,
            joined_at: record.joined_at,
            last_seen_at: record.last_seen_at,
            heartbeat_seconds,
            ttl_seconds,
        }
    }
}

/// Authenticated viewer with display metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerResponse {
    pub user_id: Uuid,
    pub username: String,
    pub rank: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl ViewerResponse {
    #[must_use]
    pub fn new(record: &PresenceRecord, user: &ForumUser) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            rank: user.rank.clone(),
            avatar_url: user.avatar_url.clone(),
            joined_at: record.joined_at,
        }
    }
}

/// Who is viewing a target right now.
///
/// Serialized into Redis as a short-lived cache, hence `Deserialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerListResponse {
    pub target_type: TargetType,
    pub target_id: Uuid,
    pub authenticated: Vec<ViewerResponse>,
    pub anonymous_count: usize,
    pub total: usize,
}

impl ViewerListResponse {
    #[must_use]
    pub fn new(target: Target, authenticated: Vec<ViewerResponse>, anonymous_count: usize) -> Self {
        let total = authenticated.len() + anonymous_count;
        Self {
            target_type: target.target_type,
            target_id: target.target_id,
            authenticated,
            anonymous_count,
            total,
        }
    }
}

// ============================================================================
// Read state
// ============================================================================

/// Stored read marker after a mark-read call
#[derive(Debug, Clone, Serialize)]
pub struct ReadMarkerResponse {
    pub topic_id: Uuid,
    pub last_read_post_number: i64,
    pub last_read_at: DateTime<Utc>,
    /// Whether this call moved the pointer (stale positions are ignored)
    pub advanced: bool,
}

impl ReadMarkerResponse {
    #[must_use]
    pub fn new(marker: ReadMarker, advanced: bool) -> Self {
        Self {
            topic_id: marker.topic_id,
            last_read_post_number: marker.last_read_post_number,
            last_read_at: marker.last_read_at,
            advanced,
        }
    }
}

/// Single unread flag
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UnreadResponse {
    pub unread: bool,
}

/// Batched unread flags; every requested id is present
#[derive(Debug, Clone, Serialize)]
pub struct UnreadBatchResponse {
    pub unread: HashMap<Uuid, bool>,
}

// ============================================================================
// Statistics
// ============================================================================

/// Forum-wide totals.
///
/// Cached in Redis under the stats key, hence `Deserialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForumStatsResponse {
    pub total_topics: i64,
    pub total_posts: i64,
    pub total_users: i64,
}

/// Historical concurrent-viewers record plus the current count
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ViewersRecordResponse {
    /// Historical maximum; 0 when no record exists yet
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    pub current_viewers: i64,
}

impl ViewersRecordResponse {
    #[must_use]
    pub fn new(record: Option<ViewersRecord>, current_viewers: i64) -> Self {
        Self {
            count: record.map_or(0, |r| r.count),
            recorded_at: record.map(|r| r.recorded_at),
            current_viewers,
        }
    }
}

// ============================================================================
// Health
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    #[must_use]
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category::new("Saltwater", "saltwater", 1)
    }

    #[test]
    fn test_not_found_context_shape() {
        let context = ForumContextResponse::not_found();
        assert!(context.kind.is_none());
        assert!(context.breadcrumbs.is_empty());

        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["kind"], serde_json::Value::Null);
    }

    #[test]
    fn test_breadcrumbs_are_root_first() {
        let category = category();
        let subcategory = Subcategory::new(category.id, "Surfcasting", "surfcasting", 1);
        let subforum = Subforum::new(subcategory.id, "Rigs", "rigs", 1);

        let context = ForumContextResponse::subforum(
            category.clone(),
            subcategory.clone(),
            subforum.clone(),
        );
        assert_eq!(context.kind, Some(TargetType::Subforum));
        assert_eq!(
            context.breadcrumbs,
            vec![
                BreadcrumbResponse::new(&category.name, &category.slug),
                BreadcrumbResponse::new(&subcategory.name, &subcategory.slug),
                BreadcrumbResponse::new(&subforum.name, &subforum.slug),
            ]
        );
    }

    #[test]
    fn test_viewer_list_totals() {
        let target = Target::topic(Uuid::new_v4());
        let list = ViewerListResponse::new(target, Vec::new(), 3);
        assert_eq!(list.total, 3);
        assert_eq!(list.anonymous_count, 3);
    }

    #[test]
    fn test_viewers_record_defaults_to_zero() {
        let response = ViewersRecordResponse::new(None, 12);
        assert_eq!(response.count, 0);
        assert!(response.recorded_at.is_none());
        assert_eq!(response.current_viewers, 12);
    }
}
