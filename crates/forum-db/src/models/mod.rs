//! Database models - SQLx-compatible structs for PostgreSQL tables

mod hierarchy;
mod presence;
mod read_marker;
mod topic;
mod user;

pub use hierarchy::{CategoryModel, SubcategoryModel, SubforumModel};
pub use presence::PresenceRecordModel;
pub use read_marker::{ReadMarkerModel, UnreadFlagRow};
pub use topic::{TopicModel, TopicTotalsRow};
pub use user::ForumUserModel;
