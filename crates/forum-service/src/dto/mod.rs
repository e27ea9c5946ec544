//! Data transfer objects for the service layer

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
