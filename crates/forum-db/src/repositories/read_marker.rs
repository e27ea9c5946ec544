//! PostgreSQL implementation of ReadMarkerRepository
//!
//! Unread computation joins topics against read markers in SQL so batch
//! endpoints stay at one round trip regardless of fan-out size.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::ReadMarker;
use forum_core::traits::{ReadMarkerRepository, RepoResult, UnreadFlag};

use crate::models::{ReadMarkerModel, UnreadFlagRow};

use super::error::map_db_error;

/// PostgreSQL implementation of ReadMarkerRepository
#[derive(Clone)]
pub struct PgReadMarkerRepository {
    pool: PgPool,
}

impl PgReadMarkerRepository {
    /// Create a new PgReadMarkerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every requested id gets a flag; ids the query did not return (deleted
    /// rows, foreign ids) come back as read.
    fn fill_missing(ids: &[Uuid], rows: Vec<UnreadFlagRow>) -> Vec<UnreadFlag> {
        let found: HashMap<Uuid, bool> = rows.into_iter().map(|r| (r.id, r.has_unread)).collect();
        ids.iter()
            .map(|id| UnreadFlag {
                id: *id,
                has_unread: found.get(id).copied().unwrap_or(false),
            })
            .collect()
    }
}

#[async_trait]
impl ReadMarkerRepository for PgReadMarkerRepository {
    #[instrument(skip(self, marker), fields(topic_id = %marker.topic_id))]
    async fn upsert(&self, marker: &ReadMarker) -> RepoResult<ReadMarker> {
        // GREATEST keeps the pointer monotonic under concurrent writes from
        // multiple tabs; last_read_at only moves when the pointer does.
        let result = sqlx::query_as::<_, ReadMarkerModel>(
            r#"
            INSERT INTO read_markers (user_id, topic_id, last_read_post_number, last_read_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, topic_id)
            DO UPDATE SET
                last_read_post_number = GREATEST(read_markers.last_read_post_number, EXCLUDED.last_read_post_number),
                last_read_at = CASE
                    WHEN EXCLUDED.last_read_post_number > read_markers.last_read_post_number
                    THEN EXCLUDED.last_read_at
                    ELSE read_markers.last_read_at
                END
            RETURNING user_id, topic_id, last_read_post_number, last_read_at
            "#,
        )
        .bind(marker.user_id)
        .bind(marker.topic_id)
        .bind(marker.last_read_post_number)
        .bind(marker.last_read_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ReadMarker::from(result))
    }

    #[instrument(skip(self))]
    async fn find(&self, user_id: Uuid, topic_id: Uuid) -> RepoResult<Option<ReadMarker>> {
        let result = sqlx::query_as::<_, ReadMarkerModel>(
            r#"
            SELECT user_id, topic_id, last_read_post_number, last_read_at
            FROM read_markers
            WHERE user_id = $1 AND topic_id = $2
            "#,
        )
        .bind(user_id)
        .bind(topic_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReadMarker::from))
    }

    #[instrument(skip(self))]
    async fn has_unread(&self, user_id: Uuid, topic_id: Uuid) -> RepoResult<bool> {
        // No marker reads as position 0, so a topic with posts and no marker
        // is unread. A missing topic yields false.
        let unread: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM topics t
                LEFT JOIN read_markers m ON m.topic_id = t.id AND m.user_id = $1
                WHERE t.id = $2
                  AND t.last_post_number > COALESCE(m.last_read_post_number, 0)
            )
            "#,
        )
        .bind(user_id)
        .bind(topic_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(unread)
    }

    #[instrument(skip(self, topic_ids), fields(count = topic_ids.len()))]
    async fn has_unread_batch(
        &self,
        user_id: Uuid,
        topic_ids: &[Uuid],
    ) -> RepoResult<Vec<UnreadFlag>> {
        if topic_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UnreadFlagRow>(
            r#"
            SELECT t.id AS id,
                   (t.last_post_number > COALESCE(m.last_read_post_number, 0)) AS has_unread
            FROM topics t
            LEFT JOIN read_markers m ON m.topic_id = t.id AND m.user_id = $1
            WHERE t.id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(topic_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Self::fill_missing(topic_ids, rows))
    }

    #[instrument(skip(self))]
    async fn has_unread_in_subcategory(
        &self,
        user_id: Uuid,
        subcategory_id: Uuid,
    ) -> RepoResult<bool> {
        // Covers topics directly in the subcategory and topics in any of its
        // subforums.
        let unread: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM topics t
                LEFT JOIN read_markers m ON m.topic_id = t.id AND m.user_id = $1
                WHERE (t.subcategory_id = $2
                       OR t.subforum_id IN (SELECT sf.id FROM subforums sf WHERE sf.subcategory_id = $2))
                  AND t.last_post_number > COALESCE(m.last_read_post_number, 0)
            )
            "#,
        )
        .bind(user_id)
        .bind(subcategory_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(unread)
    }

    #[instrument(skip(self, subcategory_ids), fields(count = subcategory_ids.len()))]
    async fn has_unread_in_subcategories(
        &self,
        user_id: Uuid,
        subcategory_ids: &[Uuid],
    ) -> RepoResult<Vec<UnreadFlag>> {
        if subcategory_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UnreadFlagRow>(
            r#"
            SELECT sc.id AS id,
                   EXISTS (
                       SELECT 1
                       FROM topics t
                       LEFT JOIN read_markers m ON m.topic_id = t.id AND m.user_id = $1
                       WHERE (t.subcategory_id = sc.id
                              OR t.subforum_id IN (SELECT sf.id FROM subforums sf WHERE sf.subcategory_id = sc.id))
                         AND t.last_post_number > COALESCE(m.last_read_post_number, 0)
                   ) AS has_unread
            FROM subcategories sc
            WHERE sc.id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(subcategory_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Self::fill_missing(subcategory_ids, rows))
    }

    #[instrument(skip(self))]
    async fn has_unread_in_subforum(&self, user_id: Uuid, subforum_id: Uuid) -> RepoResult<bool> {
        let unread: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM topics t
                LEFT JOIN read_markers m ON m.topic_id = t.id AND m.user_id = $1
                WHERE t.subforum_id = $2
                  AND t.last_post_number > COALESCE(m.last_read_post_number, 0)
            )
            "#,
        )
        .bind(user_id)
        .bind(subforum_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(unread)
    }

    #[instrument(skip(self, subforum_ids), fields(count = subforum_ids.len()))]
    async fn has_unread_in_subforums(
        &self,
        user_id: Uuid,
        subforum_ids: &[Uuid],
    ) -> RepoResult<Vec<UnreadFlag>> {
        if subforum_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, UnreadFlagRow>(
            r#"
            SELECT sf.id AS id,
                   EXISTS (
                       SELECT 1
                       FROM topics t
                       LEFT JOIN read_markers m ON m.topic_id = t.id AND m.user_id = $1
                       WHERE t.subforum_id = sf.id
                         AND t.last_post_number > COALESCE(m.last_read_post_number, 0)
                   ) AS has_unread
            FROM subforums sf
            WHERE sf.id = ANY($2)
            "#,
        )
        .bind(user_id)
        .bind(subforum_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Self::fill_missing(subforum_ids, rows))
    }
}
