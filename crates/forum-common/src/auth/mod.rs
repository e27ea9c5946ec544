//! Access-token validation (tokens are issued by the external identity provider)

mod jwt;

pub use jwt::{Claims, JwtService};
