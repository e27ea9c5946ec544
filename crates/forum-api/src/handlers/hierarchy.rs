//! Hierarchy handlers
//!
//! Slug resolution and hierarchy entity creation.

use axum::{
    extract::{Path, State},
    Json,
};
use forum_service::dto::{
    CategoryResponse, CreateCategoryRequest, CreateSubcategoryRequest, CreateSubforumRequest,
    ForumContextResponse, SubcategoryResponse, SubforumResponse,
};
use forum_service::HierarchyService;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Resolve a bare slug to its forum context
///
/// GET /forum/resolve/{slug}
///
/// A slug matching nothing answers 200 with `kind: null`.
pub async fn resolve_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ForumContextResponse>> {
    let service = HierarchyService::new(state.service_context());
    let context = service.resolve(&slug).await?;
    Ok(Json(context))
}

/// Create a category
///
/// POST /forum/categories
pub async fn create_category(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<Created<Json<CategoryResponse>>> {
    let service = HierarchyService::new(state.service_context());
    let response = service.create_category(request).await?;
    Ok(Created(Json(response)))
}

/// Create a subcategory
///
/// POST /forum/subcategories
pub async fn create_subcategory(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateSubcategoryRequest>,
) -> ApiResult<Created<Json<SubcategoryResponse>>> {
    let service = HierarchyService::new(state.service_context());
    let response = service.create_subcategory(request).await?;
    Ok(Created(Json(response)))
}

/// Create a subforum
///
/// POST /forum/subforums
pub async fn create_subforum(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateSubforumRequest>,
) -> ApiResult<Created<Json<SubforumResponse>>> {
    let service = HierarchyService::new(state.service_context());
    let response = service.create_subforum(request).await?;
    Ok(Created(Json(response)))
}
