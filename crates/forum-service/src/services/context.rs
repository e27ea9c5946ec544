//! Service context - dependency container for services
//!
//! Holds all repositories, cache stores, and other dependencies needed by
//! services.

use std::sync::Arc;
use std::time::Duration;

use forum_cache::{AnonymousSessionStore, FlagCache, Publisher, SharedRedisPool, StatsStore};
use forum_common::auth::JwtService;
use forum_common::PresenceConfig;
use forum_core::traits::{
    ForumUserRepository, HierarchyRepository, PresenceRepository, ReadMarkerRepository,
    TopicRepository,
};
use forum_db::PgPool;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - Redis cache stores and the in-process flag cache
/// - JWT service for token validation
/// - Redis pub/sub for the change feed
/// - Presence timing configuration
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Redis pool
    redis_pool: SharedRedisPool,

    // Repositories
    presence_repo: Arc<dyn PresenceRepository>,
    marker_repo: Arc<dyn ReadMarkerRepository>,
    hierarchy_repo: Arc<dyn HierarchyRepository>,
    topic_repo: Arc<dyn TopicRepository>,
    user_repo: Arc<dyn ForumUserRepository>,

    // Cache stores
    anonymous_sessions: AnonymousSessionStore,
    stats_store: StatsStore,
    flag_cache: Arc<FlagCache>,

    // Pub/Sub
    publisher: Publisher,

    // Services
    jwt_service: Arc<JwtService>,

    // Timing configuration
    presence: PresenceConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        presence_repo: Arc<dyn PresenceRepository>,
        marker_repo: Arc<dyn ReadMarkerRepository>,
        hierarchy_repo: Arc<dyn HierarchyRepository>,
        topic_repo: Arc<dyn TopicRepository>,
        user_repo: Arc<dyn ForumUserRepository>,
        jwt_service: Arc<JwtService>,
        presence: PresenceConfig,
    ) -> Self {
        // Clone the inner RedisPool from the Arc
        let inner_pool = (*redis_pool).clone();
        let anonymous_sessions =
            AnonymousSessionStore::new(inner_pool.clone(), presence.ttl_seconds);
        let stats_store = StatsStore::new(inner_pool.clone(), presence.poll_interval_seconds);
        let publisher = Publisher::new(inner_pool);
        // Memoized flags age out on the poll interval so a missed event is
        // repaired by the next poll
        let flag_cache = Arc::new(FlagCache::new(Duration::from_secs(
            presence.poll_interval_seconds,
        )));

        Self {
            pool,
            redis_pool,
            presence_repo,
            marker_repo,
            hierarchy_repo,
            topic_repo,
            user_repo,
            anonymous_sessions,
            stats_store,
            flag_cache,
            publisher,
            jwt_service,
            presence,
        }
    }

    // === Pools ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    /// Get the presence repository
    pub fn presence_repo(&self) -> &dyn PresenceRepository {
        self.presence_repo.as_ref()
    }

    /// Get the read marker repository
    pub fn marker_repo(&self) -> &dyn ReadMarkerRepository {
        self.marker_repo.as_ref()
    }

    /// Get the hierarchy repository
    pub fn hierarchy_repo(&self) -> &dyn HierarchyRepository {
        self.hierarchy_repo.as_ref()
    }

    /// Get the topic repository
    pub fn topic_repo(&self) -> &dyn TopicRepository {
        self.topic_repo.as_ref()
    }

    /// Get the forum user repository
    pub fn user_repo(&self) -> &dyn ForumUserRepository {
        self.user_repo.as_ref()
    }

    // === Cache Stores ===

    /// Get the anonymous session store
    pub fn anonymous_sessions(&self) -> &AnonymousSessionStore {
        &self.anonymous_sessions
    }

    /// Get the statistics store
    pub fn stats_store(&self) -> &StatsStore {
        &self.stats_store
    }

    /// Get the in-process unread flag cache
    pub fn flag_cache(&self) -> &FlagCache {
        self.flag_cache.as_ref()
    }

    // === Pub/Sub ===

    /// Get the Redis pub/sub publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    // === Configuration ===

    /// Get the presence timing configuration
    pub fn presence_config(&self) -> &PresenceConfig {
        &self.presence
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("cache_stores", &"...")
            .field("presence", &self.presence)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    presence_repo: Option<Arc<dyn PresenceRepository>>,
    marker_repo: Option<Arc<dyn ReadMarkerRepository>>,
    hierarchy_repo: Option<Arc<dyn HierarchyRepository>>,
    topic_repo: Option<Arc<dyn TopicRepository>>,
    user_repo: Option<Arc<dyn ForumUserRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    presence: Option<PresenceConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            redis_pool: None,
            presence_repo: None,
            marker_repo: None,
            hierarchy_repo: None,
            topic_repo: None,
            user_repo: None,
            jwt_service: None,
            presence: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn presence_repo(mut self, repo: Arc<dyn PresenceRepository>) -> Self {
        self.presence_repo = Some(repo);
        self
    }

    pub fn marker_repo(mut self, repo: Arc<dyn ReadMarkerRepository>) -> Self {
        self.marker_repo = Some(repo);
        self
    }

    pub fn hierarchy_repo(mut self, repo: Arc<dyn HierarchyRepository>) -> Self {
        self.hierarchy_repo = Some(repo);
        self
    }

    pub fn topic_repo(mut self, repo: Arc<dyn TopicRepository>) -> Self {
        self.topic_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn ForumUserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn presence_config(mut self, presence: PresenceConfig) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool
                .ok_or_else(|| super::error::ServiceError::validation("pool is required"))?,
            self.redis_pool
                .ok_or_else(|| super::error::ServiceError::validation("redis_pool is required"))?,
            self.presence_repo.ok_or_else(|| {
                super::error::ServiceError::validation("presence_repo is required")
            })?,
            self.marker_repo
                .ok_or_else(|| super::error::ServiceError::validation("marker_repo is required"))?,
            self.hierarchy_repo.ok_or_else(|| {
                super::error::ServiceError::validation("hierarchy_repo is required")
            })?,
            self.topic_repo
                .ok_or_else(|| super::error::ServiceError::validation("topic_repo is required"))?,
            self.user_repo
                .ok_or_else(|| super::error::ServiceError::validation("user_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| super::error::ServiceError::validation("jwt_service is required"))?,
            self.presence.unwrap_or_default(),
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
