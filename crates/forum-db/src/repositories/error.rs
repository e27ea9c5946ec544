//! Error handling utilities for repositories

use forum_core::error::DomainError;
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "topic not found" error
pub fn topic_not_found(id: Uuid) -> DomainError {
    DomainError::TopicNotFound(id)
}

/// Create a "slug taken" error for hierarchy creation
pub fn slug_taken(slug: &str) -> DomainError {
    DomainError::SlugTaken(slug.to_string())
}
