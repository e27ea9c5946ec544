//! Read marker model → entity conversion

use forum_core::entities::ReadMarker;
use forum_core::traits::UnreadFlag;

use crate::models::{ReadMarkerModel, UnreadFlagRow};

impl From<ReadMarkerModel> for ReadMarker {
    fn from(model: ReadMarkerModel) -> Self {
        ReadMarker {
            user_id: model.user_id,
            topic_id: model.topic_id,
            last_read_post_number: model.last_read_post_number,
            last_read_at: model.last_read_at,
        }
    }
}

impl From<UnreadFlagRow> for UnreadFlag {
    fn from(row: UnreadFlagRow) -> Self {
        UnreadFlag {
            id: row.id,
            has_unread: row.has_unread,
        }
    }
}
