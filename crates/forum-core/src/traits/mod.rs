//! Repository traits (ports)

mod repositories;

pub use repositories::{
    ForumUserRepository, HierarchyRepository, PresenceRepository, ReadMarkerRepository,
    RepoResult, TopicRepository, UnreadFlag,
};
