//! # forum-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! Provides:
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives and model → entity
//!   conversions in `mappers`
//! - Repository implementations for presence records, read markers, the
//!   forum hierarchy, topics, and user display metadata

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgForumUserRepository, PgHierarchyRepository, PgPresenceRepository, PgReadMarkerRepository,
    PgTopicRepository,
};
