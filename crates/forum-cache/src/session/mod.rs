//! Anonymous viewer session storage

mod anonymous;

pub use anonymous::AnonymousSessionStore;
