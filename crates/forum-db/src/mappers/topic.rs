//! Topic model → entity conversion

use forum_core::entities::Topic;

use crate::models::TopicModel;

impl From<TopicModel> for Topic {
    fn from(model: TopicModel) -> Self {
        Topic {
            id: model.id,
            subcategory_id: model.subcategory_id,
            subforum_id: model.subforum_id,
            title: model.title,
            slug: model.slug,
            reply_count: model.reply_count,
            last_post_number: model.last_post_number,
            last_post_at: model.last_post_at,
            created_at: model.created_at,
        }
    }
}
