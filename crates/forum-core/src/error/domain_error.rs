//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Subcategory not found: {0}")]
    SubcategoryNotFound(Uuid),

    #[error("Subforum not found: {0}")]
    SubforumNotFound(Uuid),

    #[error("Topic not found: {0}")]
    TopicNotFound(Uuid),

    #[error("Presence record not found: {0}")]
    PresenceRecordNotFound(Uuid),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    #[error("Topic must belong to exactly one of subcategory or subforum")]
    InvalidTopicPlacement,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Subjects may only mutate their own records")]
    NotRecordOwner,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",
            Self::SubcategoryNotFound(_) => "UNKNOWN_SUBCATEGORY",
            Self::SubforumNotFound(_) => "UNKNOWN_SUBFORUM",
            Self::TopicNotFound(_) => "UNKNOWN_TOPIC",
            Self::PresenceRecordNotFound(_) => "UNKNOWN_PRESENCE_RECORD",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidSlug(_) => "INVALID_SLUG",
            Self::InvalidTopicPlacement => "INVALID_TOPIC_PLACEMENT",

            // Authorization
            Self::NotRecordOwner => "NOT_RECORD_OWNER",

            // Conflict
            Self::SlugTaken(_) => "SLUG_TAKEN",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::SubcategoryNotFound(_)
                | Self::SubforumNotFound(_)
                | Self::TopicNotFound(_)
                | Self::PresenceRecordNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidSlug(_) | Self::InvalidTopicPlacement
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotRecordOwner)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::SlugTaken(_))
    }

    /// Check if this is a transient infrastructure error worth retrying on
    /// the next scheduled tick
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::CacheError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let id = Uuid::new_v4();
        assert!(DomainError::TopicNotFound(id).is_not_found());
        assert!(DomainError::SlugTaken("techniques".into()).is_conflict());
        assert!(DomainError::DatabaseError("timeout".into()).is_transient());
        assert!(!DomainError::SlugTaken("x".into()).is_not_found());
    }

    #[test]
    fn test_codes() {
        assert_eq!(DomainError::SlugTaken("x".into()).code(), "SLUG_TAKEN");
        assert_eq!(
            DomainError::TopicNotFound(Uuid::nil()).code(),
            "UNKNOWN_TOPIC"
        );
    }
}
