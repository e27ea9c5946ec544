//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use forum_cache::{RedisPool, RedisPoolConfig};
use forum_common::{AppConfig, AppError, JwtService};
use forum_db::{
    create_pool, PgForumUserRepository, PgHierarchyRepository, PgPresenceRepository,
    PgReadMarkerRepository, PgTopicRepository,
};
use forum_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;
use crate::tasks;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes are merged outside the middleware stack so liveness probes
/// stay cheap.
pub fn create_app(state: AppState) -> Router {
    let is_production = state.config().app.env.is_production();
    let router = create_router();
    let router = apply_middleware(router, &state.config().cors, is_production);
    router.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = forum_db::DatabaseConfig::from_app_config(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create Redis pool
    info!("Connecting to Redis...");
    let redis_config = RedisPoolConfig::from(&config.redis);
    let redis_pool = RedisPool::new(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
    let shared_redis = Arc::new(redis_pool);
    info!("Redis connection established");

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(&config.jwt.secret));

    // Create repositories
    let presence_repo = Arc::new(PgPresenceRepository::new(pool.clone()));
    let marker_repo = Arc::new(PgReadMarkerRepository::new(pool.clone()));
    let hierarchy_repo = Arc::new(PgHierarchyRepository::new(pool.clone()));
    let topic_repo = Arc::new(PgTopicRepository::new(pool.clone()));
    let user_repo = Arc::new(PgForumUserRepository::new(pool.clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .redis_pool(shared_redis)
        .presence_repo(presence_repo)
        .marker_repo(marker_repo)
        .hierarchy_repo(hierarchy_repo)
        .topic_repo(topic_repo)
        .user_repo(user_repo)
        .jwt_service(jwt_service)
        .presence_config(config.presence.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {}", e)))?;

    // Create app state
    let state = create_app_state(config).await?;

    // Background tasks: the event feed subscriber and the flag cache sweeper
    tasks::spawn_invalidation_listener(state.clone())
        .await
        .map_err(|e| AppError::Cache(e.to_string()))?;
    tasks::spawn_flag_sweeper(state.clone());

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
