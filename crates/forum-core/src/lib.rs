//! # forum-core
//!
//! Domain layer for the forum presence & read-state tracker: entities,
//! value objects, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Category, ForumUser, PresenceRecord, ReadMarker, Subcategory, Subforum, Topic, TopicAncestry,
};
pub use error::DomainError;
pub use events::ForumEvent;
pub use traits::{
    ForumUserRepository, HierarchyRepository, PresenceRepository, ReadMarkerRepository,
    RepoResult, TopicRepository, UnreadFlag,
};
pub use value_objects::{Subject, SubjectId, Target, TargetType, TargetTypeParseError};
