//! PostgreSQL repository implementations

pub mod error;

mod hierarchy;
mod presence;
mod read_marker;
mod topic;
mod user;

pub use hierarchy::PgHierarchyRepository;
pub use presence::PgPresenceRepository;
pub use read_marker::PgReadMarkerRepository;
pub use topic::PgTopicRepository;
pub use user::PgForumUserRepository;
