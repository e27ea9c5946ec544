//! Model → entity conversions

mod hierarchy;
mod presence;
mod read_marker;
mod topic;
mod user;
