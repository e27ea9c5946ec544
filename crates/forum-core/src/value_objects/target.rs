//! Forum target - a resource that can have viewers and/or a read state.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of forum resource a subject can view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Category,
    Subcategory,
    Subforum,
    Topic,
}

impl TargetType {
    /// Stable string form used in storage keys and routes
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Subforum => "subforum",
            Self::Topic => "topic",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing a `TargetType` from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid target type: {0}")]
pub struct TargetTypeParseError(pub String);

impl std::str::FromStr for TargetType {
    type Err = TargetTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "category" => Ok(Self::Category),
            "subcategory" => Ok(Self::Subcategory),
            "subforum" => Ok(Self::Subforum),
            "topic" => Ok(Self::Topic),
            other => Err(TargetTypeParseError(other.to_string())),
        }
    }
}

/// A concrete forum resource: type plus id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub target_type: TargetType,
    pub target_id: Uuid,
}

impl Target {
    #[must_use]
    pub fn new(target_type: TargetType, target_id: Uuid) -> Self {
        Self {
            target_type,
            target_id,
        }
    }

    #[must_use]
    pub fn topic(id: Uuid) -> Self {
        Self::new(TargetType::Topic, id)
    }

    #[must_use]
    pub fn subcategory(id: Uuid) -> Self {
        Self::new(TargetType::Subcategory, id)
    }

    #[must_use]
    pub fn subforum(id: Uuid) -> Self {
        Self::new(TargetType::Subforum, id)
    }

    #[must_use]
    pub fn category(id: Uuid) -> Self {
        Self::new(TargetType::Category, id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target_type, self.target_id)
    }
}
