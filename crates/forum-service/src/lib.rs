//! # forum-service
//!
//! Application layer containing the presence, read-state, hierarchy, and
//! statistics use cases, plus their request/response DTOs.

pub mod dto;
pub mod services;

pub use services::{
    HierarchyService, IdentityService, InvalidationService, PresenceService, ReadStateService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, StatsService,
};
