//! Request DTOs with validation

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Request to advance a read marker
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MarkReadRequest {
    /// Position of the newest post the user has seen
    #[validate(range(min = 1, message = "post_number must be at least 1"))]
    pub post_number: i64,
}

/// Batch unread lookup over topics
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TopicUnreadBatchRequest {
    #[validate(length(min = 1, max = 200, message = "topic_ids must contain 1-200 entries"))]
    pub topic_ids: Vec<Uuid>,
}

/// Batch unread lookup over subcategories
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubcategoryUnreadBatchRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "subcategory_ids must contain 1-200 entries"
    ))]
    pub subcategory_ids: Vec<Uuid>,
}

/// Batch unread lookup over subforums
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubforumUnreadBatchRequest {
    #[validate(length(min = 1, max = 200, message = "subforum_ids must contain 1-200 entries"))]
    pub subforum_ids: Vec<Uuid>,
}

/// Request to create a top-level category
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 80, message = "slug must be 1-80 characters"))]
    pub slug: String,

    #[serde(default)]
    pub sort_order: i32,
}

/// Request to create a subcategory under a category
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubcategoryRequest {
    pub category_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 80, message = "slug must be 1-80 characters"))]
    pub slug: String,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

/// Request to create a subforum under a subcategory
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubforumRequest {
    pub subcategory_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 80, message = "slug must be 1-80 characters"))]
    pub slug: String,

    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub sort_order: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_read_rejects_zero() {
        let request = MarkReadRequest { post_number: 0 };
        assert!(request.validate().is_err());

        let request = MarkReadRequest { post_number: 1 };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_batch_request_rejects_empty() {
        let request = TopicUnreadBatchRequest { topic_ids: vec![] };
        assert!(request.validate().is_err());

        let request = TopicUnreadBatchRequest {
            topic_ids: vec![Uuid::new_v4()],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_category_bounds() {
        let request = CreateCategoryRequest {
            name: String::new(),
            slug: "saltwater".to_string(),
            sort_order: 0,
        };
        assert!(request.validate().is_err());

        let request = CreateCategoryRequest {
            name: "Saltwater".to_string(),
            slug: "saltwater".to_string(),
            sort_order: 0,
        };
        assert!(request.validate().is_ok());
    }
}
