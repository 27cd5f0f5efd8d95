//! Category service layer.
//!
//! Categories form a tree via a nullable parent reference. The only cycle
//! guard is the self-parent check on update; deletion is refused while the
//! category still has children or associated books.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use entity::{book, book_category, category};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select,
};
use serde::Deserialize;
use tracing::info;

use crate::modules::auth::{policy, CurrentUser};
use crate::modules::storage::{FileStorage, UploadedFile, CATEGORIES_DIR};

use super::slug;
use super::validation::{self, FieldErrors};
use super::{Page, ServiceError};

/// Fixed page size for category listings.
pub const PER_PAGE: u64 = 15;

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i32>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryFilters {
    pub search: Option<String>,
    /// "parent" for root categories, "child" for nested ones
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// "1" means active, any other value inactive
    pub status: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct OptionFilters {
    #[serde(default)]
    pub parent_only: bool,
    #[serde(default)]
    pub parent_id: Option<i32>,
}

// ============================================================================
// Outputs
// ============================================================================

#[derive(Debug)]
pub struct CategoryWithRelations {
    pub category: category::Model,
    pub parent: Option<category::Model>,
    pub children: Vec<category::Model>,
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryStats {
    pub total_categories: u64,
    pub parent_categories: u64,
    pub child_categories: u64,
    pub active_categories: u64,
}

// ============================================================================
// Category Service
// ============================================================================

pub struct CategoryService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a FileStorage,
}

impl<'a> CategoryService<'a> {
    pub fn new(db: &'a DatabaseConnection, storage: &'a FileStorage) -> Self {
        Self { db, storage }
    }

    pub async fn stats(&self) -> Result<CategoryStats, ServiceError> {
        let alive = category::Entity::find().filter(category::Column::DeletedAt.is_null());

        let total_categories = alive.clone().count(self.db).await?;
        let parent_categories = alive
            .clone()
            .filter(category::Column::ParentId.is_null())
            .count(self.db)
            .await?;
        let child_categories = alive
            .clone()
            .filter(category::Column::ParentId.is_not_null())
            .count(self.db)
            .await?;
        let active_categories = alive
            .filter(category::Column::IsActive.eq(true))
            .count(self.db)
            .await?;

        Ok(CategoryStats {
            total_categories,
            parent_categories,
            child_categories,
            active_categories,
        })
    }

    pub async fn list(
        &self,
        actor: &CurrentUser,
        filters: &CategoryFilters,
        page: u64,
    ) -> Result<Page<CategoryWithRelations>, ServiceError> {
        if !policy::categories::view_any(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let paginator = self.filtered(filters).paginate(self.db, PER_PAGE);
        let counts = paginator.num_items_and_pages().await?;

        let current_page = page.max(1);
        let categories = paginator.fetch_page(current_page - 1).await?;
        let items = self.load_relations(categories).await?;

        Ok(Page {
            items,
            total: counts.number_of_items,
            per_page: PER_PAGE,
            current_page,
            last_page: counts.number_of_pages.max(1),
        })
    }

    pub async fn get(
        &self,
        actor: &CurrentUser,
        id: i32,
    ) -> Result<CategoryWithRelations, ServiceError> {
        if !policy::categories::view_any(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let category = self.find_alive(id).await?;
        let mut loaded = self.load_relations(vec![category]).await?;
        loaded
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Category".to_string()))
    }

    /// Active categories for select widgets, optionally restricted to roots
    /// or to the children of one parent.
    pub async fn options(
        &self,
        filters: &OptionFilters,
    ) -> Result<Vec<category::Model>, ServiceError> {
        let mut query = category::Entity::find()
            .filter(category::Column::DeletedAt.is_null())
            .filter(category::Column::IsActive.eq(true));

        if filters.parent_only {
            query = query.filter(category::Column::ParentId.is_null());
        }

        if let Some(parent_id) = filters.parent_id {
            query = query.filter(category::Column::ParentId.eq(parent_id));
        }

        Ok(query
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn create(
        &self,
        actor: &CurrentUser,
        input: CategoryInput,
        image: Option<UploadedFile>,
    ) -> Result<CategoryWithRelations, ServiceError> {
        if !policy::categories::create(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        self.validate(&input, None, image.as_ref()).await?;

        let slug_value = self.unique_slug(&input.name, None).await?;

        let sort_order = match input.sort_order {
            Some(value) => value,
            None => self.next_sort_order(input.parent_id).await?,
        };

        let image_path = match image {
            Some(file) => Some(self.storage.store(CATEGORIES_DIR, &file)?),
            None => None,
        };

        let now = Utc::now();
        let model = category::ActiveModel {
            name: Set(input.name.clone()),
            slug: Set(slug_value),
            description: Set(input.description.clone()),
            parent_id: Set(input.parent_id),
            sort_order: Set(sort_order),
            is_active: Set(input.is_active.unwrap_or(true)),
            image: Set(image_path.clone()),
            meta_title: Set(input.meta_title.clone()),
            meta_description: Set(input.meta_description.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let category = match model.insert(self.db).await {
            Ok(category) => category,
            Err(e) => {
                self.discard_stored(image_path.as_deref());
                return Err(e.into());
            }
        };

        info!(category_id = category.id, name = %category.name, "Category created");

        let mut loaded = self.load_relations(vec![category]).await?;
        loaded
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Category".to_string()))
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i32,
        input: CategoryInput,
        image: Option<UploadedFile>,
    ) -> Result<CategoryWithRelations, ServiceError> {
        if !policy::categories::update(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let category = self.find_alive(id).await?;

        self.validate(&input, Some(id), image.as_ref()).await?;

        // A category can never be its own parent
        if input.parent_id == Some(id) {
            let mut errors = FieldErrors::new();
            errors.add("parent_id", "A category cannot be its own parent");
            return Err(ServiceError::Validation(errors));
        }

        let slug_value = if input.name != category.name {
            self.unique_slug(&input.name, Some(id)).await?
        } else {
            category.slug.clone()
        };

        let new_image = match image {
            Some(file) => {
                if let Some(old) = category.image.as_deref() {
                    self.discard_stored(Some(old));
                }
                Some(self.storage.store(CATEGORIES_DIR, &file)?)
            }
            None => None,
        };

        let mut model = category.clone().into_active_model();
        model.name = Set(input.name.clone());
        model.slug = Set(slug_value);
        model.description = Set(input.description.clone());
        model.parent_id = Set(input.parent_id);
        if let Some(value) = input.sort_order {
            model.sort_order = Set(value);
        }
        if let Some(value) = input.is_active {
            model.is_active = Set(value);
        }
        if let Some(path) = new_image.clone() {
            model.image = Set(Some(path));
        }
        model.meta_title = Set(input.meta_title.clone());
        model.meta_description = Set(input.meta_description.clone());
        model.updated_at = Set(Utc::now().into());

        let category = match model.update(self.db).await {
            Ok(category) => category,
            Err(e) => {
                self.discard_stored(new_image.as_deref());
                return Err(e.into());
            }
        };

        info!(category_id = category.id, "Category updated");

        let mut loaded = self.load_relations(vec![category]).await?;
        loaded
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Category".to_string()))
    }

    /// Soft delete, refused while the category still has children or books.
    pub async fn delete(&self, actor: &CurrentUser, id: i32) -> Result<(), ServiceError> {
        if !policy::categories::delete(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let category = self.find_alive(id).await?;

        let children = category::Entity::find()
            .filter(category::Column::ParentId.eq(id))
            .filter(category::Column::DeletedAt.is_null())
            .count(self.db)
            .await?;
        if children > 0 {
            return Err(ServiceError::BusinessRule(
                "Cannot delete a category that has subcategories".to_string(),
            ));
        }

        let member_books = book_category::Entity::find()
            .select_only()
            .column(book_category::Column::BookId)
            .filter(book_category::Column::CategoryId.eq(id))
            .into_query();
        let books = book::Entity::find()
            .filter(book::Column::DeletedAt.is_null())
            .filter(book::Column::Id.in_subquery(member_books))
            .count(self.db)
            .await?;
        if books > 0 {
            return Err(ServiceError::BusinessRule(
                "Cannot delete a category that has associated books".to_string(),
            ));
        }

        let mut model = category.into_active_model();
        model.deleted_at = Set(Some(Utc::now().into()));
        model.update(self.db).await?;

        info!(category_id = id, "Category soft-deleted");
        Ok(())
    }

    pub async fn toggle_active(
        &self,
        actor: &CurrentUser,
        id: i32,
    ) -> Result<category::Model, ServiceError> {
        if !policy::categories::update(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let category = self.find_alive(id).await?;
        let flipped = !category.is_active;

        let mut model = category.into_active_model();
        model.is_active = Set(flipped);
        Ok(model.update(self.db).await?)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn find_alive(&self, id: i32) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .filter(category::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {id}")))
    }

    fn filtered(&self, filters: &CategoryFilters) -> Select<category::Entity> {
        let mut query = category::Entity::find().filter(category::Column::DeletedAt.is_null());

        if let Some(term) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{term}%");
            query = query.filter(
                Condition::any()
                    .add(category::Column::Name.like(&pattern))
                    .add(category::Column::Description.like(&pattern)),
            );
        }

        match filters.kind.as_deref() {
            Some("parent") => query = query.filter(category::Column::ParentId.is_null()),
            Some("child") => query = query.filter(category::Column::ParentId.is_not_null()),
            _ => {}
        }

        if let Some(status) = filters.status.as_deref() {
            query = query.filter(category::Column::IsActive.eq(status == "1"));
        }

        query
            .order_by_asc(category::Column::ParentId)
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Name)
    }

    async fn load_relations(
        &self,
        categories: Vec<category::Model>,
    ) -> Result<Vec<CategoryWithRelations>, ServiceError> {
        let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();
        let parent_ids: BTreeSet<i32> = categories.iter().filter_map(|c| c.parent_id).collect();

        let parents: HashMap<i32, category::Model> = if parent_ids.is_empty() {
            HashMap::new()
        } else {
            category::Entity::find()
                .filter(category::Column::Id.is_in(parent_ids))
                .all(self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        };

        let mut children_by_parent: HashMap<i32, Vec<category::Model>> = HashMap::new();
        if !ids.is_empty() {
            let children = category::Entity::find()
                .filter(category::Column::ParentId.is_in(ids))
                .filter(category::Column::DeletedAt.is_null())
                .order_by_asc(category::Column::SortOrder)
                .order_by_asc(category::Column::Name)
                .all(self.db)
                .await?;
            for child in children {
                if let Some(parent_id) = child.parent_id {
                    children_by_parent.entry(parent_id).or_default().push(child);
                }
            }
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let parent = category.parent_id.and_then(|id| parents.get(&id).cloned());
                let children = children_by_parent.remove(&category.id).unwrap_or_default();
                CategoryWithRelations {
                    category,
                    parent,
                    children,
                }
            })
            .collect())
    }

    async fn unique_slug(
        &self,
        name: &str,
        exclude_id: Option<i32>,
    ) -> Result<String, ServiceError> {
        let base = slug::slugify(name);

        for candidate in slug::candidates(&base) {
            let mut query = category::Entity::find().filter(category::Column::Slug.eq(&candidate));
            if let Some(id) = exclude_id {
                query = query.filter(category::Column::Id.ne(id));
            }

            if query.count(self.db).await? == 0 {
                return Ok(candidate);
            }
        }

        unreachable!("slug candidate sequence is infinite")
    }

    /// New categories land after their siblings unless an explicit order is
    /// supplied.
    async fn next_sort_order(&self, parent_id: Option<i32>) -> Result<i32, ServiceError> {
        let mut query = category::Entity::find()
            .select_only()
            .column_as(category::Column::SortOrder.max(), "max_sort_order")
            .filter(category::Column::DeletedAt.is_null());

        query = match parent_id {
            Some(id) => query.filter(category::Column::ParentId.eq(id)),
            None => query.filter(category::Column::ParentId.is_null()),
        };

        let max: Option<Option<i32>> = query.into_tuple().one(self.db).await?;

        Ok(max.flatten().unwrap_or(0) + 1)
    }

    async fn validate(
        &self,
        input: &CategoryInput,
        exclude_id: Option<i32>,
        image: Option<&UploadedFile>,
    ) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();

        validation::require(&mut errors, "name", &input.name, 255);

        if !input.name.trim().is_empty() {
            let mut query = category::Entity::find().filter(category::Column::Name.eq(&input.name));
            if let Some(id) = exclude_id {
                query = query.filter(category::Column::Id.ne(id));
            }
            if query.count(self.db).await? > 0 {
                errors.add("name", "The name has already been taken");
            }
        }

        if let Some(parent_id) = input.parent_id {
            let found = category::Entity::find_by_id(parent_id)
                .filter(category::Column::DeletedAt.is_null())
                .count(self.db)
                .await?;
            if found == 0 {
                errors.add("parent_id", "The selected parent category is invalid");
            }
        }

        if let Some(sort_order) = input.sort_order {
            if sort_order < 0 {
                errors.add("sort_order", "The sort_order field must be at least 0");
            }
        }

        validation::optional_max(&mut errors, "meta_title", input.meta_title.as_deref(), 255);

        if let Some(file) = image {
            validation::check_image(&mut errors, "image", file);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(errors))
        }
    }

    fn discard_stored(&self, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = self.storage.delete(path) {
                tracing::warn!(path = %path, error = %e, "Failed to remove stored file");
            }
        }
    }
}
