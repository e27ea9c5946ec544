//! Service layer - business logic for the presence and read-state tracker

pub mod context;
pub mod error;
pub mod hierarchy;
pub mod identity;
pub mod invalidation;
pub mod presence;
pub mod read_state;
pub mod stats;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use hierarchy::HierarchyService;
pub use identity::IdentityService;
pub use invalidation::InvalidationService;
pub use presence::PresenceService;
pub use read_state::ReadStateService;
pub use stats::StatsService;
