//! Hierarchy model → entity conversions

use forum_core::entities::{Category, Subcategory, Subforum};

use crate::models::{CategoryModel, SubcategoryModel, SubforumModel};

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Category {
            id: model.id,
            name: model.name,
            slug: model.slug,
            sort_order: model.sort_order,
            created_at: model.created_at,
        }
    }
}

impl From<SubcategoryModel> for Subcategory {
    fn from(model: SubcategoryModel) -> Self {
        Subcategory {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            sort_order: model.sort_order,
            created_at: model.created_at,
        }
    }
}

impl From<SubforumModel> for Subforum {
    fn from(model: SubforumModel) -> Self {
        Subforum {
            id: model.id,
            subcategory_id: model.subcategory_id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            sort_order: model.sort_order,
            created_at: model.created_at,
        }
    }
}
