//! Statistics handlers

use axum::{extract::State, Json};

use forum_service::dto::{ForumStatsResponse, ViewersRecordResponse};
use forum_service::StatsService;

use crate::response::ApiResult;
use crate::state::AppState;

/// Forum-wide totals
///
/// GET /stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<ForumStatsResponse>> {
    let stats = StatsService::new(state.service_context()).get_stats().await?;
    Ok(Json(stats))
}

/// Historical concurrent-viewers record
///
/// GET /stats/viewers-record
///
/// Also observes the current live count, so fetching the record keeps it up
/// to date.
pub async fn viewers_record(
    State(state): State<AppState>,
) -> ApiResult<Json<ViewersRecordResponse>> {
    let record = StatsService::new(state.service_context())
        .viewers_record()
        .await?;
    Ok(Json(record))
}
