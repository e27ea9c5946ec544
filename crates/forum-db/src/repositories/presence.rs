//! PostgreSQL implementation of PresenceRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::PresenceRecord;
use forum_core::traits::{PresenceRepository, RepoResult};
use forum_core::value_objects::Target;

use crate::models::PresenceRecordModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PresenceRepository
#[derive(Clone)]
pub struct PgPresenceRepository {
    pool: PgPool,
}

impl PgPresenceRepository {
    /// Create a new PgPresenceRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceRepository for PgPresenceRepository {
    #[instrument(skip(self, record), fields(target = %record.target))]
    async fn upsert(&self, record: &PresenceRecord) -> RepoResult<PresenceRecord> {
        // One row per (subject, target); a re-join while a stale row still
        // exists refreshes it instead of inserting a duplicate. The later of
        // two concurrent upserts wins on last_seen_at.
        let result = sqlx::query_as::<_, PresenceRecordModel>(
            r#"
            INSERT INTO presence_records (id, subject_id, target_type, target_id, joined_at, last_seen_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (subject_id, target_type, target_id)
            DO UPDATE SET last_seen_at = EXCLUDED.last_seen_at
            RETURNING id, subject_id, target_type, target_id, joined_at, last_seen_at
            "#,
        )
        .bind(record.id)
        .bind(record.subject.to_string())
        .bind(record.target.target_type.as_str())
        .bind(record.target.target_id)
        .bind(record.joined_at)
        .bind(record.last_seen_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        PresenceRecord::try_from(result)
    }

    #[instrument(skip(self))]
    async fn heartbeat(&self, record_id: Uuid, now: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE presence_records
            SET last_seen_at = $2
            WHERE id = $1
            "#,
        )
        .bind(record_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, record_id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM presence_records WHERE id = $1")
            .bind(record_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, record_id: Uuid) -> RepoResult<Option<PresenceRecord>> {
        let result = sqlx::query_as::<_, PresenceRecordModel>(
            r#"
            SELECT id, subject_id, target_type, target_id, joined_at, last_seen_at
            FROM presence_records
            WHERE id = $1
            "#,
        )
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PresenceRecord::try_from).transpose()
    }

    #[instrument(skip(self), fields(target = %target))]
    async fn purge_stale(&self, target: Target, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM presence_records
            WHERE target_type = $1 AND target_id = $2 AND last_seen_at < $3
            "#,
        )
        .bind(target.target_type.as_str())
        .bind(target.target_id)
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(target = %target))]
    async fn list_live(
        &self,
        target: Target,
        cutoff: DateTime<Utc>,
    ) -> RepoResult<Vec<PresenceRecord>> {
        let results = sqlx::query_as::<_, PresenceRecordModel>(
            r#"
            SELECT id, subject_id, target_type, target_id, joined_at, last_seen_at
            FROM presence_records
            WHERE target_type = $1 AND target_id = $2 AND last_seen_at >= $3
            ORDER BY joined_at ASC
            "#,
        )
        .bind(target.target_type.as_str())
        .bind(target.target_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results
            .into_iter()
            .map(PresenceRecord::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn count_live(&self, cutoff: DateTime<Utc>) -> RepoResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM presence_records WHERE last_seen_at >= $1")
                .bind(cutoff)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(count)
    }
}
