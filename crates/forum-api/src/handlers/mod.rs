//! HTTP request handlers organized by domain

pub mod health;
pub mod hierarchy;
pub mod presence;
pub mod read_state;
pub mod stats;
