//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Create category request
#[derive(Debug, Serialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
}

impl CreateCategoryRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("Test Category {suffix}"),
            slug: format!("test-category-{suffix}"),
            sort_order: 1,
        }
    }
}

/// Create subcategory request
#[derive(Debug, Serialize)]
pub struct CreateSubcategoryRequest {
    pub category_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl CreateSubcategoryRequest {
    pub fn child_of(category_id: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            category_id: category_id.to_string(),
            name: format!("Test Subcategory {suffix}"),
            slug: format!("test-subcategory-{suffix}"),
            description: Some("Discussion area for tests".to_string()),
            sort_order: 1,
        }
    }
}

/// Create subforum request
#[derive(Debug, Serialize)]
pub struct CreateSubforumRequest {
    pub subcategory_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl CreateSubforumRequest {
    pub fn child_of(subcategory_id: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            subcategory_id: subcategory_id.to_string(),
            name: format!("Test Subforum {suffix}"),
            slug: format!("test-subforum-{suffix}"),
            description: None,
            sort_order: 1,
        }
    }
}

/// Category response
#[derive(Debug, Deserialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
}

/// Subcategory response
#[derive(Debug, Deserialize)]
pub struct SubcategoryResponse {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// Subforum response
#[derive(Debug, Deserialize)]
pub struct SubforumResponse {
    pub id: String,
    pub subcategory_id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// Breadcrumb step in a resolved context
#[derive(Debug, Deserialize)]
pub struct BreadcrumbResponse {
    pub name: String,
    pub slug: String,
}

/// Resolved forum context for a slug
#[derive(Debug, Deserialize)]
pub struct ForumContextResponse {
    pub kind: Option<String>,
    pub category: Option<CategoryResponse>,
    pub subcategory: Option<SubcategoryResponse>,
    pub subforum: Option<SubforumResponse>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryResponse>,
    #[serde(default)]
    pub subforums: Vec<SubforumResponse>,
    pub breadcrumbs: Vec<BreadcrumbResponse>,
}

/// Viewing session handle
#[derive(Debug, Deserialize)]
pub struct PresenceSessionResponse {
    pub record_id: String,
    pub target_type: String,
    pub target_id: String,
    pub joined_at: String,
    pub last_seen_at: String,
    pub heartbeat_seconds: u64,
    pub ttl_seconds: u64,
}

/// Authenticated viewer entry
#[derive(Debug, Deserialize)]
pub struct ViewerResponse {
    pub user_id: String,
    pub username: String,
    pub rank: String,
    pub avatar_url: Option<String>,
    pub joined_at: String,
}

/// Viewer list for a target
#[derive(Debug, Deserialize)]
pub struct ViewerListResponse {
    pub target_type: String,
    pub target_id: String,
    pub authenticated: Vec<ViewerResponse>,
    pub anonymous_count: usize,
    pub total: usize,
}

/// Mark-read request
#[derive(Debug, Serialize)]
pub struct MarkReadRequest {
    pub post_number: i64,
}

/// Batched unread request over topic ids
#[derive(Debug, Serialize)]
pub struct TopicUnreadBatchRequest {
    pub topic_ids: Vec<String>,
}

/// Single unread flag
#[derive(Debug, Deserialize)]
pub struct UnreadResponse {
    pub unread: bool,
}

/// Batched unread flags keyed by id
#[derive(Debug, Deserialize)]
pub struct UnreadBatchResponse {
    pub unread: HashMap<String, bool>,
}

/// Forum-wide totals
#[derive(Debug, Deserialize)]
pub struct ForumStatsResponse {
    pub total_topics: i64,
    pub total_posts: i64,
    pub total_users: i64,
}

/// Concurrent-viewers record
#[derive(Debug, Deserialize)]
pub struct ViewersRecordResponse {
    pub count: i64,
    pub recorded_at: Option<String>,
    pub current_viewers: i64,
}

/// Error response
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
