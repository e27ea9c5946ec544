//! Domain entities - core business objects

mod hierarchy;
mod presence;
mod read_marker;
mod topic;
mod user;

pub use hierarchy::{Category, Subcategory, Subforum};
pub use presence::PresenceRecord;
pub use read_marker::ReadMarker;
pub use topic::{Topic, TopicAncestry};
pub use user::ForumUser;
