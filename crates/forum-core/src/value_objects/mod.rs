//! Value objects - small immutable types shared across the domain

mod subject;
mod target;

pub use subject::{Subject, SubjectId, ANON_PREFIX};
pub use target::{Target, TargetType, TargetTypeParseError};
