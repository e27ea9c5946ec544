//! Read-state handlers
//!
//! Mark-read plus single and batched unread flags. All read-state endpoints
//! require authentication: anonymous browsers have no markers.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use forum_service::dto::{
    MarkReadRequest, SubcategoryUnreadBatchRequest, SubforumUnreadBatchRequest,
    TopicUnreadBatchRequest, UnreadBatchResponse, UnreadResponse,
};
use forum_service::ReadStateService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Advance the read marker for a topic
///
/// POST /topics/{topic_id}/read
///
/// The one action whose errors are surfaced to the caller.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(topic_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<MarkReadRequest>,
) -> ApiResult<NoContent> {
    ReadStateService::new(state.service_context())
        .mark_read(auth.user_id, topic_id, request)
        .await?;
    Ok(NoContent)
}

/// Unread flag for one topic
///
/// GET /topics/{topic_id}/unread
pub async fn topic_unread(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(topic_id): Path<Uuid>,
) -> ApiResult<Json<UnreadResponse>> {
    let unread = ReadStateService::new(state.service_context())
        .is_unread(auth.user_id, topic_id)
        .await?;
    Ok(Json(UnreadResponse { unread }))
}

/// Unread flags for many topics
///
/// POST /topics/unread-batch
pub async fn topic_unread_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<TopicUnreadBatchRequest>,
) -> ApiResult<Json<UnreadBatchResponse>> {
    let unread = ReadStateService::new(state.service_context())
        .is_unread_batch(auth.user_id, &request.topic_ids)
        .await?;
    Ok(Json(UnreadBatchResponse { unread }))
}

/// Aggregate unread flag for a subcategory
///
/// GET /subcategories/{subcategory_id}/unread
pub async fn subcategory_unread(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(subcategory_id): Path<Uuid>,
) -> ApiResult<Json<UnreadResponse>> {
    let unread = ReadStateService::new(state.service_context())
        .is_subcategory_unread(auth.user_id, subcategory_id)
        .await?;
    Ok(Json(UnreadResponse { unread }))
}

/// Aggregate unread flags for many subcategories
///
/// POST /subcategories/unread-batch
pub async fn subcategory_unread_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SubcategoryUnreadBatchRequest>,
) -> ApiResult<Json<UnreadBatchResponse>> {
    let unread = ReadStateService::new(state.service_context())
        .is_subcategory_unread_batch(auth.user_id, &request.subcategory_ids)
        .await?;
    Ok(Json(UnreadBatchResponse { unread }))
}

/// Aggregate unread flag for a subforum
///
/// GET /subforums/{subforum_id}/unread
pub async fn subforum_unread(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(subforum_id): Path<Uuid>,
) -> ApiResult<Json<UnreadResponse>> {
    let unread = ReadStateService::new(state.service_context())
        .is_subforum_unread(auth.user_id, subforum_id)
        .await?;
    Ok(Json(UnreadResponse { unread }))
}

/// Aggregate unread flags for many subforums
///
/// POST /subforums/unread-batch
pub async fn subforum_unread_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<SubforumUnreadBatchRequest>,
) -> ApiResult<Json<UnreadBatchResponse>> {
    let unread = ReadStateService::new(state.service_context())
        .is_subforum_unread_batch(auth.user_id, &request.subforum_ids)
        .await?;
    Ok(Json(UnreadBatchResponse { unread }))
}
