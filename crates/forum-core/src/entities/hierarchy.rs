//! Hierarchy entities - category, subcategory, and subforum.
//!
//! Slugs are unique across the combined namespace of all three types. The
//! resolver probes a bare slug as subcategory, then subforum, then category,
//! so uniqueness is enforced at creation time rather than relying on probe
//! order to mask collisions.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Top-level forum category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Subcategory - direct child of a category, the most common topic holder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Subforum - child of a subcategory, one level deeper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subforum {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, slug: impl Into<String>, sort_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: slug.into(),
            sort_order,
            created_at: Utc::now(),
        }
    }
}

impl Subcategory {
    pub fn new(
        category_id: Uuid,
        name: impl Into<String>,
        slug: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            sort_order,
            created_at: Utc::now(),
        }
    }
}

impl Subforum {
    pub fn new(
        subcategory_id: Uuid,
        name: impl Into<String>,
        slug: impl Into<String>,
        sort_order: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subcategory_id,
            name: name.into(),
            slug: slug.into(),
            description: None,
            sort_order,
            created_at: Utc::now(),
        }
    }
}
