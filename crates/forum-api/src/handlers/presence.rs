//! Presence handlers
//!
//! Viewing-session lifecycle and per-target viewer lists. Subject identity
//! is always derived from the caller's token or device key, never from the
//! request body.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;
use uuid::Uuid;

use forum_core::entities::PresenceRecord;
use forum_core::error::DomainError;
use forum_core::value_objects::{Subject, Target};
use forum_service::dto::{PresenceSessionResponse, ViewerListResponse};
use forum_service::{IdentityService, PresenceService};

use crate::extractors::{DeviceKey, OptionalAuthUser, TargetPath};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Join a target as a viewer
///
/// POST /viewing/{target_type}/{target_id}
pub async fn join(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    device_key: DeviceKey,
    TargetPath(target): TargetPath,
) -> ApiResult<Created<Json<PresenceSessionResponse>>> {
    let ctx = state.service_context();
    let subject = IdentityService::new(ctx)
        .resolve_subject(auth.user_id(), device_key.as_deref(), target)
        .await?;

    let response = PresenceService::new(ctx).join(target, &subject).await?;
    Ok(Created(Json(response)))
}

/// Heartbeat a viewing session
///
/// PUT /viewing/sessions/{record_id}
///
/// 204 whether or not the record still exists; a vanished record means the
/// client should rejoin.
pub async fn heartbeat(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    device_key: DeviceKey,
    Path(record_id): Path<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = state.service_context();
    let Some(subject) = resolve_session_subject(&state, auth, &device_key, record_id).await? else {
        return Ok(NoContent);
    };

    PresenceService::new(ctx)
        .heartbeat(record_id, &subject)
        .await?;
    Ok(NoContent)
}

/// Leave a viewing session
///
/// DELETE /viewing/sessions/{record_id}
pub async fn leave(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    device_key: DeviceKey,
    Path(record_id): Path<Uuid>,
) -> ApiResult<NoContent> {
    let ctx = state.service_context();
    let Some(subject) = resolve_session_subject(&state, auth, &device_key, record_id).await? else {
        return Ok(NoContent);
    };

    PresenceService::new(ctx).leave(record_id, &subject).await?;
    Ok(NoContent)
}

/// List viewers of a target
///
/// GET /viewing/{target_type}/{target_id}
pub async fn get_viewers(
    State(state): State<AppState>,
    TargetPath(target): TargetPath,
) -> ApiResult<Json<ViewerListResponse>> {
    let response = PresenceService::new(state.service_context())
        .get_viewers(target)
        .await?;
    Ok(Json(response))
}

/// Outcome of looking up a session's own record before a mutation
enum SessionTarget {
    /// Record found; resolve the subject against its target
    Known(Target),
    /// Record gone (expired or already left); any target works because the
    /// service treats the mutation as a no-op
    Missing,
    /// Store unreachable; skip the mutation, the client retries next tick
    Unavailable,
}

fn classify_session_lookup(lookup: Result<Option<PresenceRecord>, DomainError>) -> SessionTarget {
    match lookup {
        Ok(Some(record)) => SessionTarget::Known(record.target),
        Ok(None) => SessionTarget::Missing,
        Err(_) => SessionTarget::Unavailable,
    }
}

/// Resolve the caller's subject for a session mutation.
///
/// The anonymous id is keyed per target, so the session's own target is
/// looked up first. `None` means the lookup itself failed and the caller
/// should answer 204 without touching the session.
async fn resolve_session_subject(
    state: &AppState,
    auth: OptionalAuthUser,
    device_key: &DeviceKey,
    record_id: Uuid,
) -> ApiResult<Option<Subject>> {
    let ctx = state.service_context();

    let lookup = ctx.presence_repo().find_by_id(record_id).await;
    if let Err(err) = &lookup {
        warn!(record_id = %record_id, error = %err, "Session lookup failed; skipping update");
    }

    let target = match classify_session_lookup(lookup) {
        SessionTarget::Known(target) => target,
        SessionTarget::Missing => Target::topic(Uuid::nil()),
        SessionTarget::Unavailable => return Ok(None),
    };

    let subject = IdentityService::new(ctx)
        .resolve_subject(auth.user_id(), device_key.as_deref(), target)
        .await?;
    Ok(Some(subject))
}
