//! PostgreSQL implementation of HierarchyRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use forum_core::entities::{Category, Subcategory, Subforum};
use forum_core::traits::{HierarchyRepository, RepoResult};

use crate::models::{CategoryModel, SubcategoryModel, SubforumModel};

use super::error::{map_db_error, map_unique_violation, slug_taken};

/// PostgreSQL implementation of HierarchyRepository
#[derive(Clone)]
pub struct PgHierarchyRepository {
    pool: PgPool,
}

impl PgHierarchyRepository {
    /// Create a new PgHierarchyRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HierarchyRepository for PgHierarchyRepository {
    #[instrument(skip(self))]
    async fn find_category_by_id(&self, id: Uuid) -> RepoResult<Option<Category>> {
        let result = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, name, slug, sort_order, created_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn find_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let result = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, name, slug, sort_order, created_at
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn find_subcategory_by_id(&self, id: Uuid) -> RepoResult<Option<Subcategory>> {
        let result = sqlx::query_as::<_, SubcategoryModel>(
            r#"
            SELECT id, category_id, name, slug, description, sort_order, created_at
            FROM subcategories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Subcategory::from))
    }

    #[instrument(skip(self))]
    async fn find_subcategory_by_slug(&self, slug: &str) -> RepoResult<Option<Subcategory>> {
        let result = sqlx::query_as::<_, SubcategoryModel>(
            r#"
            SELECT id, category_id, name, slug, description, sort_order, created_at
            FROM subcategories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Subcategory::from))
    }

    #[instrument(skip(self))]
    async fn find_subforum_by_id(&self, id: Uuid) -> RepoResult<Option<Subforum>> {
        let result = sqlx::query_as::<_, SubforumModel>(
            r#"
            SELECT id, subcategory_id, name, slug, description, sort_order, created_at
            FROM subforums
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Subforum::from))
    }

    #[instrument(skip(self))]
    async fn find_subforum_by_slug(&self, slug: &str) -> RepoResult<Option<Subforum>> {
        let result = sqlx::query_as::<_, SubforumModel>(
            r#"
            SELECT id, subcategory_id, name, slug, description, sort_order, created_at
            FROM subforums
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Subforum::from))
    }

    #[instrument(skip(self))]
    async fn subcategories_of(&self, category_id: Uuid) -> RepoResult<Vec<Subcategory>> {
        let results = sqlx::query_as::<_, SubcategoryModel>(
            r#"
            SELECT id, category_id, name, slug, description, sort_order, created_at
            FROM subcategories
            WHERE category_id = $1
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Subcategory::from).collect())
    }

    #[instrument(skip(self))]
    async fn subforums_of(&self, subcategory_id: Uuid) -> RepoResult<Vec<Subforum>> {
        let results = sqlx::query_as::<_, SubforumModel>(
            r#"
            SELECT id, subcategory_id, name, slug, description, sort_order, created_at
            FROM subforums
            WHERE subcategory_id = $1
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .bind(subcategory_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Subforum::from).collect())
    }

    #[instrument(skip(self))]
    async fn slug_in_use(&self, slug: &str) -> RepoResult<bool> {
        // Slugs share one namespace across all three tables; the bare-slug
        // resolver depends on a hit being unambiguous.
        let in_use: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM categories WHERE slug = $1)
                OR EXISTS (SELECT 1 FROM subcategories WHERE slug = $1)
                OR EXISTS (SELECT 1 FROM subforums WHERE slug = $1)
            "#,
        )
        .bind(slug)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(in_use)
    }

    #[instrument(skip(self, category), fields(slug = %category.slug))]
    async fn create_category(&self, category: &Category) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, sort_order, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(category.sort_order)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || slug_taken(&category.slug)))?;

        Ok(())
    }

    #[instrument(skip(self, subcategory), fields(slug = %subcategory.slug))]
    async fn create_subcategory(&self, subcategory: &Subcategory) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subcategories (id, category_id, name, slug, description, sort_order, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(subcategory.id)
        .bind(subcategory.category_id)
        .bind(&subcategory.name)
        .bind(&subcategory.slug)
        .bind(&subcategory.description)
        .bind(subcategory.sort_order)
        .bind(subcategory.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || slug_taken(&subcategory.slug)))?;

        Ok(())
    }

    #[instrument(skip(self, subforum), fields(slug = %subforum.slug))]
    async fn create_subforum(&self, subforum: &Subforum) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subforums (id, subcategory_id, name, slug, description, sort_order, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(subforum.id)
        .bind(subforum.subcategory_id)
        .bind(&subforum.name)
        .bind(&subforum.slug)
        .bind(&subforum.description)
        .bind(subforum.sort_order)
        .bind(subforum.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || slug_taken(&subforum.slug)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgHierarchyRepository>();
    }
}
