//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. All writes here are single-key upserts or
//! deletes; no cross-record transactions are required.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{
    Category, ForumUser, PresenceRecord, ReadMarker, Subcategory, Subforum, Topic,
};
use crate::error::DomainError;
use crate::value_objects::Target;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Presence Repository
// ============================================================================

#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Idempotent upsert on `(subject, target)`: refresh `last_seen_at` of an
    /// existing record (live or stale) or insert a fresh one. The later of
    /// two concurrent upserts wins; no error is raised.
    async fn upsert(&self, record: &PresenceRecord) -> RepoResult<PresenceRecord>;

    /// Refresh `last_seen_at` by record id. Returns false when the record is
    /// gone (expired or left), which is not an error.
    async fn heartbeat(&self, record_id: Uuid, now: DateTime<Utc>) -> RepoResult<bool>;

    /// Delete by record id. Best-effort from the caller's point of view.
    async fn delete(&self, record_id: Uuid) -> RepoResult<bool>;

    /// Look up a record by id (ownership checks before mutation)
    async fn find_by_id(&self, record_id: Uuid) -> RepoResult<Option<PresenceRecord>>;

    /// Delete all records for `target` last seen before `cutoff`.
    /// Returns the number purged.
    async fn purge_stale(&self, target: Target, cutoff: DateTime<Utc>) -> RepoResult<u64>;

    /// List records for `target` last seen at or after `cutoff`
    async fn list_live(&self, target: Target, cutoff: DateTime<Utc>)
        -> RepoResult<Vec<PresenceRecord>>;

    /// Count live records across all targets (concurrent-viewers record)
    async fn count_live(&self, cutoff: DateTime<Utc>) -> RepoResult<i64>;
}

// ============================================================================
// Read Marker Repository
// ============================================================================

/// Per-topic unread flag returned by batch queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnreadFlag {
    pub id: Uuid,
    pub has_unread: bool,
}

#[async_trait]
pub trait ReadMarkerRepository: Send + Sync {
    /// Monotonic upsert: create the `(user, topic)` marker or advance it,
    /// never moving the pointer backward. Returns the stored marker.
    async fn upsert(&self, marker: &ReadMarker) -> RepoResult<ReadMarker>;

    /// Find the marker for `(user, topic)`
    async fn find(&self, user_id: Uuid, topic_id: Uuid) -> RepoResult<Option<ReadMarker>>;

    /// True iff the topic's newest post is beyond the user's marker, or no
    /// marker exists and the topic has at least one post.
    async fn has_unread(&self, user_id: Uuid, topic_id: Uuid) -> RepoResult<bool>;

    /// Batch form of `has_unread`: one round trip, a flag for every id
    async fn has_unread_batch(
        &self,
        user_id: Uuid,
        topic_ids: &[Uuid],
    ) -> RepoResult<Vec<UnreadFlag>>;

    /// True iff any topic directly in the subcategory, or in any subforum
    /// under it, is unread for the user.
    async fn has_unread_in_subcategory(
        &self,
        user_id: Uuid,
        subcategory_id: Uuid,
    ) -> RepoResult<bool>;

    /// Batch form over subcategory ids
    async fn has_unread_in_subcategories(
        &self,
        user_id: Uuid,
        subcategory_ids: &[Uuid],
    ) -> RepoResult<Vec<UnreadFlag>>;

    /// True iff any topic in the subforum is unread for the user
    async fn has_unread_in_subforum(&self, user_id: Uuid, subforum_id: Uuid) -> RepoResult<bool>;

    /// Batch form over subforum ids
    async fn has_unread_in_subforums(
        &self,
        user_id: Uuid,
        subforum_ids: &[Uuid],
    ) -> RepoResult<Vec<UnreadFlag>>;
}

// ============================================================================
// Hierarchy Repository
// ============================================================================

#[async_trait]
pub trait HierarchyRepository: Send + Sync {
    async fn find_category_by_id(&self, id: Uuid) -> RepoResult<Option<Category>>;
    async fn find_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>>;
    async fn find_subcategory_by_id(&self, id: Uuid) -> RepoResult<Option<Subcategory>>;
    async fn find_subcategory_by_slug(&self, slug: &str) -> RepoResult<Option<Subcategory>>;
    async fn find_subforum_by_id(&self, id: Uuid) -> RepoResult<Option<Subforum>>;
    async fn find_subforum_by_slug(&self, slug: &str) -> RepoResult<Option<Subforum>>;

    /// Subcategories of a category, ordered by `sort_order`
    async fn subcategories_of(&self, category_id: Uuid) -> RepoResult<Vec<Subcategory>>;

    /// Subforums of a subcategory, ordered by `sort_order`
    async fn subforums_of(&self, subcategory_id: Uuid) -> RepoResult<Vec<Subforum>>;

    /// Check the combined slug namespace across all three entity types.
    /// Creation must reject a slug already registered anywhere.
    async fn slug_in_use(&self, slug: &str) -> RepoResult<bool>;

    async fn create_category(&self, category: &Category) -> RepoResult<()>;
    async fn create_subcategory(&self, subcategory: &Subcategory) -> RepoResult<()>;
    async fn create_subforum(&self, subforum: &Subforum) -> RepoResult<()>;
}

// ============================================================================
// Topic Repository
// ============================================================================

#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Topic>>;

    /// Totals for forum statistics: (topics, posts)
    async fn totals(&self) -> RepoResult<(i64, i64)>;
}

// ============================================================================
// Forum User Repository
// ============================================================================

#[async_trait]
pub trait ForumUserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ForumUser>>;

    /// Display metadata for many users at once (viewer list enrichment)
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<ForumUser>>;

    /// Total registered users (forum statistics)
    async fn count(&self) -> RepoResult<i64>;
}
