//! Cached forum statistics and the concurrent-viewers record

mod store;

pub use store::{StatsStore, ViewersRecord};
