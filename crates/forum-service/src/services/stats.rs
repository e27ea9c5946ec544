//! Forum statistics
//!
//! Cached forum-wide totals plus the historical concurrent-viewers record.

use chrono::{Duration, Utc};
use tracing::{debug, instrument, warn};

use crate::dto::{ForumStatsResponse, ViewersRecordResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Statistics service
pub struct StatsService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StatsService<'a> {
    /// Create a new StatsService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Forum-wide totals, cached in Redis and invalidated by the content
    /// fan-out
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> ServiceResult<ForumStatsResponse> {
        match self.ctx.stats_store().get_totals::<ForumStatsResponse>().await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Stats cache read failed; computing from database"),
        }

        let (total_topics, total_posts) = self.ctx.topic_repo().totals().await?;
        let total_users = self.ctx.user_repo().count().await?;
        let stats = ForumStatsResponse {
            total_topics,
            total_posts,
            total_users,
        };

        if let Err(e) = self.ctx.stats_store().set_totals(&stats).await {
            debug!(error = %e, "Stats cache write failed");
        }
        Ok(stats)
    }

    /// Current live viewer count across all targets, raising the historical
    /// record when beaten. Returns the record together with the observation.
    #[instrument(skip(self))]
    pub async fn viewers_record(&self) -> ServiceResult<ViewersRecordResponse> {
        let cutoff =
            Utc::now() - Duration::seconds(self.ctx.presence_config().ttl_seconds as i64);
        let current = self.ctx.presence_repo().count_live(cutoff).await?;

        if let Err(e) = self.ctx.stats_store().record_viewers(current).await {
            warn!(error = %e, "Viewers record update failed");
        }

        let record = self.ctx.stats_store().get_viewers_record().await?;
        Ok(ViewersRecordResponse::new(record, current))
    }
}
