//! Presence record model → entity conversion

use forum_core::entities::PresenceRecord;
use forum_core::error::DomainError;
use forum_core::value_objects::{SubjectId, Target, TargetType};

use crate::models::PresenceRecordModel;

/// Fallible because the stored subject and target_type columns are strings;
/// a row that fails to parse indicates corrupt data, surfaced as a database
/// error rather than silently dropped.
impl TryFrom<PresenceRecordModel> for PresenceRecord {
    type Error = DomainError;

    fn try_from(model: PresenceRecordModel) -> Result<Self, Self::Error> {
        let subject = SubjectId::parse(&model.subject_id).map_err(|e| {
            DomainError::DatabaseError(format!(
                "corrupt subject id '{}' in presence record {}: {e}",
                model.subject_id, model.id
            ))
        })?;

        let target_type: TargetType = model.target_type.parse().map_err(|e| {
            DomainError::DatabaseError(format!(
                "corrupt target type in presence record {}: {e}",
                model.id
            ))
        })?;

        Ok(PresenceRecord {
            id: model.id,
            subject,
            target: Target::new(target_type, model.target_id),
            joined_at: model.joined_at,
            last_seen_at: model.last_seen_at,
        })
    }
}
