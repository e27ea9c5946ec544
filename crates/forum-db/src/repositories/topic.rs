//! PostgreSQL implementation of TopicRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::Topic;
use forum_core::traits::{RepoResult, TopicRepository};

use crate::models::{TopicModel, TopicTotalsRow};

use super::error::map_db_error;

/// PostgreSQL implementation of TopicRepository
#[derive(Clone)]
pub struct PgTopicRepository {
    pool: PgPool,
}

impl PgTopicRepository {
    /// Create a new PgTopicRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TopicRepository for PgTopicRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Topic>> {
        let result = sqlx::query_as::<_, TopicModel>(
            r#"
            SELECT id, subcategory_id, subforum_id, title, slug,
                   reply_count, last_post_number, last_post_at, created_at
            FROM topics
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Topic::from))
    }

    #[instrument(skip(self))]
    async fn totals(&self) -> RepoResult<(i64, i64)> {
        // post_number is dense per topic, so summing the high-water marks
        // gives the forum-wide post count without touching the posts table.
        let row = sqlx::query_as::<_, TopicTotalsRow>(
            r#"
            SELECT COUNT(*) AS topics,
                   COALESCE(SUM(last_post_number), 0)::BIGINT AS posts
            FROM topics
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok((row.topics, row.posts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgTopicRepository>();
    }
}
