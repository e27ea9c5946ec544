//! PostgreSQL implementation of ForumUserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::ForumUser;
use forum_core::traits::{ForumUserRepository, RepoResult};

use crate::models::ForumUserModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ForumUserRepository
#[derive(Clone)]
pub struct PgForumUserRepository {
    pool: PgPool,
}

impl PgForumUserRepository {
    /// Create a new PgForumUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForumUserRepository for PgForumUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<ForumUser>> {
        let result = sqlx::query_as::<_, ForumUserModel>(
            r#"
            SELECT id, username, rank, avatar_url, last_seen_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ForumUser::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<ForumUser>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, ForumUserModel>(
            r#"
            SELECT id, username, rank, avatar_url, last_seen_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ForumUser::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }
}
