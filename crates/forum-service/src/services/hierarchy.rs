//! Hierarchy resolver and slug registry
//!
//! Resolves bare slugs to their forum context and creates hierarchy entities
//! under the combined slug namespace.

use tracing::{debug, info, instrument};
use validator::Validate;

use forum_core::entities::{Category, Subcategory, Subforum};
use forum_core::DomainError;

use crate::dto::{
    CategoryResponse, CreateCategoryRequest, CreateSubcategoryRequest, CreateSubforumRequest,
    ForumContextResponse, SubcategoryResponse, SubforumResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Hierarchy service
pub struct HierarchyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HierarchyService<'a> {
    /// Create a new HierarchyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve a bare slug to its forum context.
    ///
    /// Probes sequentially and short-circuits: subcategory, then subforum,
    /// then category. Slugs are unique across all three types, so the first
    /// hit is the only possible one. A slug matching nothing yields the
    /// not-found context, never an error.
    #[instrument(skip(self))]
    pub async fn resolve(&self, slug: &str) -> ServiceResult<ForumContextResponse> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ServiceError::validation("slug must not be empty"));
        }

        let repo = self.ctx.hierarchy_repo();

        if let Some(subcategory) = repo.find_subcategory_by_slug(slug).await? {
            let category = self.parent_category(subcategory.category_id).await?;
            let subforums = repo.subforums_of(subcategory.id).await?;
            return Ok(ForumContextResponse::subcategory(
                category,
                subcategory,
                subforums,
            ));
        }

        if let Some(subforum) = repo.find_subforum_by_slug(slug).await? {
            let subcategory = self.parent_subcategory(subforum.subcategory_id).await?;
            let category = self.parent_category(subcategory.category_id).await?;
            return Ok(ForumContextResponse::subforum(
                category,
                subcategory,
                subforum,
            ));
        }

        if let Some(category) = repo.find_category_by_slug(slug).await? {
            let subcategories = repo.subcategories_of(category.id).await?;
            return Ok(ForumContextResponse::category(category, subcategories));
        }

        debug!(slug = slug, "Slug matched no hierarchy entity");
        Ok(ForumContextResponse::not_found())
    }

    /// Create a top-level category
    #[instrument(skip(self, request))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> ServiceResult<CategoryResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;
        let slug = normalize_slug(&request.slug)?;
        self.ensure_slug_free(&slug).await?;

        let category = Category::new(request.name, slug, request.sort_order);
        self.ctx.hierarchy_repo().create_category(&category).await?;

        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category.into())
    }

    /// Create a subcategory under an existing category
    #[instrument(skip(self, request))]
    pub async fn create_subcategory(
        &self,
        request: CreateSubcategoryRequest,
    ) -> ServiceResult<SubcategoryResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;
        let slug = normalize_slug(&request.slug)?;

        self.ctx
            .hierarchy_repo()
            .find_category_by_id(request.category_id)
            .await?
            .ok_or(DomainError::CategoryNotFound(request.category_id))?;
        self.ensure_slug_free(&slug).await?;

        let mut subcategory =
            Subcategory::new(request.category_id, request.name, slug, request.sort_order);
        subcategory.description = request.description;
        self.ctx
            .hierarchy_repo()
            .create_subcategory(&subcategory)
            .await?;

        info!(subcategory_id = %subcategory.id, slug = %subcategory.slug, "Subcategory created");
        Ok(subcategory.into())
    }

    /// Create a subforum under an existing subcategory
    #[instrument(skip(self, request))]
    pub async fn create_subforum(
        &self,
        request: CreateSubforumRequest,
    ) -> ServiceResult<SubforumResponse> {
        request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;
        let slug = normalize_slug(&request.slug)?;

        self.ctx
            .hierarchy_repo()
            .find_subcategory_by_id(request.subcategory_id)
            .await?
            .ok_or(DomainError::SubcategoryNotFound(request.subcategory_id))?;
        self.ensure_slug_free(&slug).await?;

        let mut subforum = Subforum::new(
            request.subcategory_id,
            request.name,
            slug,
            request.sort_order,
        );
        subforum.description = request.description;
        self.ctx.hierarchy_repo().create_subforum(&subforum).await?;

        info!(subforum_id = %subforum.id, slug = %subforum.slug, "Subforum created");
        Ok(subforum.into())
    }

    /// Reject a slug already registered anywhere in the combined namespace.
    /// The unique constraints are the backstop for creation races.
    async fn ensure_slug_free(&self, slug: &str) -> ServiceResult<()> {
        if self.ctx.hierarchy_repo().slug_in_use(slug).await? {
            return Err(DomainError::SlugTaken(slug.to_string()).into());
        }
        Ok(())
    }

    async fn parent_category(&self, category_id: uuid::Uuid) -> ServiceResult<Category> {
        self.ctx
            .hierarchy_repo()
            .find_category_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::internal(format!("dangling category link {category_id}")))
    }

    async fn parent_subcategory(&self, subcategory_id: uuid::Uuid) -> ServiceResult<Subcategory> {
        self.ctx
            .hierarchy_repo()
            .find_subcategory_by_id(subcategory_id)
            .await?
            .ok_or_else(|| {
                ServiceError::internal(format!("dangling subcategory link {subcategory_id}"))
            })
    }
}

/// Normalize and validate a slug: lowercase ASCII letters, digits, hyphens
fn normalize_slug(slug: &str) -> ServiceResult<String> {
    let slug = slug.trim().to_ascii_lowercase();
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(slug)
    } else {
        Err(DomainError::InvalidSlug(slug).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug(" Pescuit-La-Mare ").unwrap(), "pescuit-la-mare");
        assert_eq!(normalize_slug("rigs2").unwrap(), "rigs2");
    }

    #[test]
    fn test_normalize_slug_rejects_bad_shapes() {
        assert!(normalize_slug("").is_err());
        assert!(normalize_slug("-leading").is_err());
        assert!(normalize_slug("trailing-").is_err());
        assert!(normalize_slug("no spaces").is_err());
        assert!(normalize_slug("no/slash").is_err());
    }
}
