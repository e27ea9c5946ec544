//! Axum extractors for request handling
//!
//! Custom extractors for authentication, the per-browser device key,
//! target paths, and validated JSON bodies.

mod auth;
mod device_key;
mod target;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use device_key::DeviceKey;
pub use target::TargetPath;
pub use validated::ValidatedJson;
