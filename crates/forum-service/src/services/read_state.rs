//! Read-state tracker
//!
//! Monotonic read markers and the unread flags derived from them, memoized
//! in the in-process flag cache under typed keys.

use std::collections::HashMap;

use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use forum_cache::CacheKey;
use forum_core::entities::ReadMarker;
use forum_core::events::ForumEvent;
use forum_core::traits::UnreadFlag;
use forum_core::DomainError;

use crate::dto::{MarkReadRequest, ReadMarkerResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::invalidation::InvalidationService;

/// Read-state service
pub struct ReadStateService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReadStateService<'a> {
    /// Create a new ReadStateService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record that `user_id` has read `topic_id` up to a post position.
    ///
    /// The pointer never moves backward; out-of-order calls from multiple
    /// tabs are idempotent. This is the one user-facing action whose failure
    /// is surfaced rather than swallowed.
    #[instrument(skip(self, request))]
    pub async fn mark_read(
        &self,
        user_id: Uuid,
        topic_id: Uuid,
        request: MarkReadRequest,
    ) -> ServiceResult<ReadMarkerResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let topic = self
            .ctx
            .topic_repo()
            .find_by_id(topic_id)
            .await?
            .ok_or(DomainError::TopicNotFound(topic_id))?;

        let advanced = self
            .ctx
            .marker_repo()
            .find(user_id, topic_id)
            .await?
            .map_or(true, |existing| existing.would_advance(request.post_number));

        let marker = ReadMarker::new(user_id, topic_id, request.post_number);
        let stored = self.ctx.marker_repo().upsert(&marker).await?;

        if advanced {
            info!(topic_id = %topic_id, post_number = request.post_number, "Read marker advanced");
            let event = ForumEvent::marker_written(user_id, topic.ancestry());
            InvalidationService::new(self.ctx).dispatch(&event).await;
        }

        Ok(ReadMarkerResponse::new(stored, advanced))
    }

    /// Whether the topic holds posts the user has not read
    #[instrument(skip(self))]
    pub async fn is_unread(&self, user_id: Uuid, topic_id: Uuid) -> ServiceResult<bool> {
        let key = CacheKey::TopicUnread {
            topic_id,
            user_id: Some(user_id),
        };
        if let Some(hit) = self.ctx.flag_cache().get(&key) {
            return Ok(hit);
        }
        let unread = self.ctx.marker_repo().has_unread(user_id, topic_id).await?;
        self.ctx.flag_cache().put(&key, unread);
        Ok(unread)
    }

    /// Unread flags for many topics in one round trip.
    ///
    /// Every requested id is present in the result; a failed lookup defaults
    /// the uncached ids to read (fail-open) instead of failing the call.
    #[instrument(skip(self, topic_ids), fields(count = topic_ids.len()))]
    pub async fn is_unread_batch(
        &self,
        user_id: Uuid,
        topic_ids: &[Uuid],
    ) -> ServiceResult<HashMap<Uuid, bool>> {
        let (mut flags, misses) = self.split_cached(topic_ids, |id| CacheKey::TopicUnread {
            topic_id: id,
            user_id: Some(user_id),
        });
        if misses.is_empty() {
            return Ok(flags);
        }

        match self.ctx.marker_repo().has_unread_batch(user_id, &misses).await {
            Ok(fetched) => self.absorb(&mut flags, fetched, |id| CacheKey::TopicUnread {
                topic_id: id,
                user_id: Some(user_id),
            }),
            Err(e) => {
                warn!(error = %e, "Batch topic unread query failed; defaulting to read");
                flags.extend(misses.into_iter().map(|id| (id, false)));
            }
        }
        Ok(flags)
    }

    /// Whether any topic directly in the subcategory, or in a subforum under
    /// it, is unread for the user
    #[instrument(skip(self))]
    pub async fn is_subcategory_unread(
        &self,
        user_id: Uuid,
        subcategory_id: Uuid,
    ) -> ServiceResult<bool> {
        let key = CacheKey::SubcategoryUnread {
            subcategory_id,
            user_id: Some(user_id),
        };
        if let Some(hit) = self.ctx.flag_cache().get(&key) {
            return Ok(hit);
        }
        let unread = self
            .ctx
            .marker_repo()
            .has_unread_in_subcategory(user_id, subcategory_id)
            .await?;
        self.ctx.flag_cache().put(&key, unread);
        Ok(unread)
    }

    /// Batch form of the subcategory aggregate, fail-open per the batch
    /// contract
    #[instrument(skip(self, subcategory_ids), fields(count = subcategory_ids.len()))]
    pub async fn is_subcategory_unread_batch(
        &self,
        user_id: Uuid,
        subcategory_ids: &[Uuid],
    ) -> ServiceResult<HashMap<Uuid, bool>> {
        let (mut flags, misses) =
            self.split_cached(subcategory_ids, |id| CacheKey::SubcategoryUnread {
                subcategory_id: id,
                user_id: Some(user_id),
            });
        if misses.is_empty() {
            return Ok(flags);
        }

        match self
            .ctx
            .marker_repo()
            .has_unread_in_subcategories(user_id, &misses)
            .await
        {
            Ok(fetched) => self.absorb(&mut flags, fetched, |id| CacheKey::SubcategoryUnread {
                subcategory_id: id,
                user_id: Some(user_id),
            }),
            Err(e) => {
                warn!(error = %e, "Batch subcategory unread query failed; defaulting to read");
                flags.extend(misses.into_iter().map(|id| (id, false)));
            }
        }
        Ok(flags)
    }

    /// Whether any topic in the subforum is unread for the user
    #[instrument(skip(self))]
    pub async fn is_subforum_unread(
        &self,
        user_id: Uuid,
        subforum_id: Uuid,
    ) -> ServiceResult<bool> {
        let key = CacheKey::SubforumUnread {
            subforum_id,
            user_id: Some(user_id),
        };
        if let Some(hit) = self.ctx.flag_cache().get(&key) {
            return Ok(hit);
        }
        let unread = self
            .ctx
            .marker_repo()
            .has_unread_in_subforum(user_id, subforum_id)
            .await?;
        self.ctx.flag_cache().put(&key, unread);
        Ok(unread)
    }

    /// Batch form of the subforum aggregate, fail-open per the batch contract
    #[instrument(skip(self, subforum_ids), fields(count = subforum_ids.len()))]
    pub async fn is_subforum_unread_batch(
        &self,
        user_id: Uuid,
        subforum_ids: &[Uuid],
    ) -> ServiceResult<HashMap<Uuid, bool>> {
        let (mut flags, misses) = self.split_cached(subforum_ids, |id| CacheKey::SubforumUnread {
            subforum_id: id,
            user_id: Some(user_id),
        });
        if misses.is_empty() {
            return Ok(flags);
        }

        match self
            .ctx
            .marker_repo()
            .has_unread_in_subforums(user_id, &misses)
            .await
        {
            Ok(fetched) => self.absorb(&mut flags, fetched, |id| CacheKey::SubforumUnread {
                subforum_id: id,
                user_id: Some(user_id),
            }),
            Err(e) => {
                warn!(error = %e, "Batch subforum unread query failed; defaulting to read");
                flags.extend(misses.into_iter().map(|id| (id, false)));
            }
        }
        Ok(flags)
    }

    /// Partition ids into cached flags and cache misses
    fn split_cached(
        &self,
        ids: &[Uuid],
        key_for: impl Fn(Uuid) -> CacheKey,
    ) -> (HashMap<Uuid, bool>, Vec<Uuid>) {
        let mut flags = HashMap::with_capacity(ids.len());
        let mut misses = Vec::new();
        for &id in ids {
            match self.ctx.flag_cache().get(&key_for(id)) {
                Some(hit) => {
                    flags.insert(id, hit);
                }
                None => misses.push(id),
            }
        }
        (flags, misses)
    }

    /// Record fetched flags in the result map and the flag cache
    fn absorb(
        &self,
        flags: &mut HashMap<Uuid, bool>,
        fetched: Vec<UnreadFlag>,
        key_for: impl Fn(Uuid) -> CacheKey,
    ) {
        for flag in fetched {
            self.ctx.flag_cache().put(&key_for(flag.id), flag.has_unread);
            flags.insert(flag.id, flag.has_unread);
        }
    }
}
