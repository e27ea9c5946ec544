//! Target path extractor
//!
//! Parses `/{target_type}/{target_id}` path segments into a typed `Target`.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use forum_core::value_objects::{Target, TargetType};

use crate::response::ApiError;

/// Typed target extracted from the request path
#[derive(Debug, Clone, Copy)]
pub struct TargetPath(pub Target);

#[async_trait]
impl<S> FromRequestParts<S> for TargetPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((target_type, target_id)) =
            Path::<(String, Uuid)>::from_request_parts(parts, state)
                .await
                .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        let target_type: TargetType = target_type
            .parse()
            .map_err(|_| ApiError::invalid_path(format!("unknown target type: {target_type}")))?;

        Ok(TargetPath(Target::new(target_type, target_id)))
    }
}
