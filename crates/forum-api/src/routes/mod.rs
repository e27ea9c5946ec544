//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{health, hierarchy, presence, read_state, stats};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health, which is
/// mounted separately so probes bypass the middleware stack)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(hierarchy_routes())
        .merge(presence_routes())
        .merge(read_state_routes())
        .merge(stats_routes())
}

/// Hierarchy routes
fn hierarchy_routes() -> Router<AppState> {
    Router::new()
        .route("/forum/resolve/:slug", get(hierarchy::resolve_slug))
        .route("/forum/categories", post(hierarchy::create_category))
        .route("/forum/subcategories", post(hierarchy::create_subcategory))
        .route("/forum/subforums", post(hierarchy::create_subforum))
}

/// Presence routes
fn presence_routes() -> Router<AppState> {
    Router::new()
        .route("/viewing/:target_type/:target_id", post(presence::join))
        .route("/viewing/:target_type/:target_id", get(presence::get_viewers))
        .route("/viewing/sessions/:record_id", put(presence::heartbeat))
        .route("/viewing/sessions/:record_id", delete(presence::leave))
}

/// Read-state routes
fn read_state_routes() -> Router<AppState> {
    Router::new()
        .route("/topics/:topic_id/read", post(read_state::mark_read))
        .route("/topics/:topic_id/unread", get(read_state::topic_unread))
        .route("/topics/unread-batch", post(read_state::topic_unread_batch))
        .route(
            "/subcategories/:subcategory_id/unread",
            get(read_state::subcategory_unread),
        )
        .route(
            "/subcategories/unread-batch",
            post(read_state::subcategory_unread_batch),
        )
        .route(
            "/subforums/:subforum_id/unread",
            get(read_state::subforum_unread),
        )
        .route(
            "/subforums/unread-batch",
            post(read_state::subforum_unread_batch),
        )
}

/// Statistics routes
fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .route("/stats/viewers-record", get(stats::viewers_record))
}
