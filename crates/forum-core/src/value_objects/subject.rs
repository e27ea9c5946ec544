//! Subject identity - authenticated user or anonymous browser session.
//!
//! Anonymous ids are minted client-side-stable strings (`anon-<millis>-<rand>`).
//! They are advisory only: presence counts for anonymous subjects are an
//! approximate metric, never an authorization signal.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Prefix that marks an anonymous subject id in its string form
pub const ANON_PREFIX: &str = "anon-";

/// Identity performing presence/read actions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubjectId {
    /// Authenticated forum user
    User(Uuid),
    /// Anonymous per-browser session id
    Anonymous(String),
}

impl SubjectId {
    /// Check whether this subject is anonymous
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }

    /// The authenticated user id, if any
    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::User(id) => Some(*id),
            Self::Anonymous(_) => None,
        }
    }

    /// Parse from the stored string form
    ///
    /// Anything carrying the `anon-` prefix is anonymous; everything else
    /// must be a uuid.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        if s.starts_with(ANON_PREFIX) {
            Ok(Self::Anonymous(s.to_string()))
        } else {
            Uuid::parse_str(s).map(Self::User)
        }
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "{id}"),
            Self::Anonymous(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for SubjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SubjectId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Resolved subject: id plus the anonymity flag the UI needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub is_anonymous: bool,
}

impl Subject {
    /// Build from an authenticated user id
    #[must_use]
    pub fn user(id: Uuid) -> Self {
        Self {
            id: SubjectId::User(id),
            is_anonymous: false,
        }
    }

    /// Build from an anonymous session id
    #[must_use]
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self {
            id: SubjectId::Anonymous(id.into()),
            is_anonymous: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        let id = Uuid::new_v4();
        let parsed = SubjectId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, SubjectId::User(id));
        assert!(!parsed.is_anonymous());
        assert_eq!(parsed.user_id(), Some(id));
    }

    #[test]
    fn test_parse_anonymous_id() {
        let parsed = SubjectId::parse("anon-1700000000-x9k2m4p").unwrap();
        assert!(parsed.is_anonymous());
        assert_eq!(parsed.user_id(), None);
        assert_eq!(parsed.to_string(), "anon-1700000000-x9k2m4p");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SubjectId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_subject_constructors() {
        let id = Uuid::new_v4();
        let user = Subject::user(id);
        assert!(!user.is_anonymous);

        let anon = Subject::anonymous("anon-1-abc");
        assert!(anon.is_anonymous);
    }

    #[test]
    fn test_serde_round_trip() {
        let id = SubjectId::Anonymous("anon-42-zzz".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"anon-42-zzz\"");
        let back: SubjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
