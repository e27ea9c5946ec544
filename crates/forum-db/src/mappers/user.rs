//! Forum user model → entity conversion

use forum_core::entities::ForumUser;

use crate::models::ForumUserModel;

impl From<ForumUserModel> for ForumUser {
    fn from(model: ForumUserModel) -> Self {
        ForumUser {
            id: model.id,
            username: model.username,
            rank: model.rank,
            avatar_url: model.avatar_url,
            last_seen_at: model.last_seen_at,
        }
    }
}
