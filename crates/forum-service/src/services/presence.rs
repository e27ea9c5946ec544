//! Presence tracker
//!
//! Join/heartbeat/leave for viewing sessions and the per-target viewer list.
//! Records live in Postgres with a sliding expiry window; viewer lists get a
//! short-lived Redis copy bounded by the heartbeat interval.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use forum_cache::CacheKey;
use forum_core::entities::PresenceRecord;
use forum_core::value_objects::{Subject, SubjectId, Target};
use forum_core::DomainError;

use crate::dto::{PresenceSessionResponse, ViewerListResponse, ViewerResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Oldest `last_seen_at` still considered live
    fn cutoff(&self) -> DateTime<Utc> {
        Utc::now() - Duration::seconds(self.ctx.presence_config().ttl_seconds as i64)
    }

    /// Register `subject` as viewing `target`.
    ///
    /// Idempotent per `(subject, target)`: a second tab or a rejoin after
    /// expiry collapses into the existing record via the upsert contract.
    #[instrument(skip(self, subject), fields(subject = %subject.id))]
    pub async fn join(
        &self,
        target: Target,
        subject: &Subject,
    ) -> ServiceResult<PresenceSessionResponse> {
        let record = PresenceRecord::new(subject.id.clone(), target);
        let stored = self.ctx.presence_repo().upsert(&record).await?;

        info!(record_id = %stored.id, target = %target, "Viewer joined");
        self.notify_viewers_changed(target).await;

        let presence = self.ctx.presence_config();
        Ok(PresenceSessionResponse::new(
            stored,
            presence.heartbeat_seconds,
            presence.ttl_seconds,
        ))
    }

    /// Refresh a session's sliding window.
    ///
    /// Returns false when the record is gone; rejoining is the caller's
    /// concern, so that is not an error.
    #[instrument(skip(self, subject), fields(subject = %subject.id))]
    pub async fn heartbeat(&self, record_id: Uuid, subject: &Subject) -> ServiceResult<bool> {
        let Some(record) = self.ctx.presence_repo().find_by_id(record_id).await? else {
            debug!(record_id = %record_id, "Heartbeat for vanished record");
            return Ok(false);
        };
        self.ensure_owner(&record, subject)?;

        let refreshed = self
            .ctx
            .presence_repo()
            .heartbeat(record_id, Utc::now())
            .await?;
        if !refreshed {
            debug!(record_id = %record_id, "Record expired between lookup and heartbeat");
        }
        Ok(refreshed)
    }

    /// End a viewing session.
    ///
    /// Best-effort: a failed delete is logged and the record expires
    /// naturally through the TTL window.
    #[instrument(skip(self, subject), fields(subject = %subject.id))]
    pub async fn leave(&self, record_id: Uuid, subject: &Subject) -> ServiceResult<()> {
        let record = match self.ctx.presence_repo().find_by_id(record_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(record_id = %record_id, "Leave for vanished record");
                return Ok(());
            }
            Err(e) => {
                warn!(record_id = %record_id, error = %e, "Lookup failed on leave; record will expire");
                return Ok(());
            }
        };
        self.ensure_owner(&record, subject)?;

        if let Err(e) = self.ctx.presence_repo().delete(record_id).await {
            warn!(record_id = %record_id, error = %e, "Delete failed on leave; record will expire");
        }
        self.notify_viewers_changed(record.target).await;
        Ok(())
    }

    /// Who is viewing `target` right now.
    ///
    /// Purges expired records first, then lists the remainder. Authenticated
    /// viewers are enriched with display metadata; an enrichment miss skips
    /// the viewer rather than failing the list. Anonymous viewers aggregate
    /// to a count only.
    #[instrument(skip(self))]
    pub async fn get_viewers(&self, target: Target) -> ServiceResult<ViewerListResponse> {
        let cache_key = CacheKey::Viewers { target }.name();
        match self
            .ctx
            .redis_pool()
            .get_value::<ViewerListResponse>(&cache_key)
            .await
        {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Viewer cache read failed; listing from database"),
        }

        let cutoff = self.cutoff();
        if let Err(e) = self.ctx.presence_repo().purge_stale(target, cutoff).await {
            // list_live filters by the same cutoff, so stale rows only linger
            warn!(target = %target, error = %e, "Stale purge failed");
        }
        let records = self.ctx.presence_repo().list_live(target, cutoff).await?;

        let mut user_ids = Vec::new();
        let mut anonymous_count = 0;
        for record in &records {
            match &record.subject {
                SubjectId::User(id) => user_ids.push(*id),
                SubjectId::Anonymous(_) => anonymous_count += 1,
            }
        }

        let users: HashMap<Uuid, _> = self
            .ctx
            .user_repo()
            .find_many(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let authenticated: Vec<ViewerResponse> = records
            .iter()
            .filter_map(|record| {
                record
                    .subject
                    .user_id()
                    .and_then(|id| users.get(&id))
                    .map(|user| ViewerResponse::new(record, user))
            })
            .collect();

        let response = ViewerListResponse::new(target, authenticated, anonymous_count);

        let ttl = self.ctx.presence_config().heartbeat_seconds;
        if let Err(e) = self
            .ctx
            .redis_pool()
            .set(&cache_key, &response, Some(ttl))
            .await
        {
            debug!(error = %e, "Viewer cache write failed");
        }

        Ok(response)
    }

    /// Sessions are mutated only by the subject that opened them
    fn ensure_owner(&self, record: &PresenceRecord, subject: &Subject) -> ServiceResult<()> {
        if record.subject == subject.id {
            Ok(())
        } else {
            Err(DomainError::NotRecordOwner.into())
        }
    }

    /// Drop the cached viewer list and notify watchers of the target.
    /// Fire-and-forget: presence writes never fail on notification errors.
    async fn notify_viewers_changed(&self, target: Target) {
        let cache_key = CacheKey::Viewers { target }.name();
        if let Err(e) = self.ctx.redis_pool().delete(&cache_key).await {
            debug!(target = %target, error = %e, "Viewer cache invalidation failed");
        }
        if let Err(e) = self.ctx.publisher().publish_viewers_changed(target).await {
            warn!(target = %target, error = %e, "Viewers-changed publish failed");
        }
    }
}
