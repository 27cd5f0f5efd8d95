//! Reference catalogs: publishers and languages.
//!
//! Plain CRUD over two small lookup tables. Publishers soft-delete;
//! languages are keyed by code and can only be removed once no live book
//! references them.

use chrono::Utc;
use entity::{book, language, publisher};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Deserialize;
use tracing::info;

use crate::modules::auth::{policy, CurrentUser};

use super::validation::{self, FieldErrors};
use super::ServiceError;

// ============================================================================
// Publishers
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PublisherInput {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub struct PublisherService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PublisherService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, actor: &CurrentUser) -> Result<Vec<publisher::Model>, ServiceError> {
        if !policy::references::view_any(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        Ok(publisher::Entity::find()
            .filter(publisher::Column::DeletedAt.is_null())
            .order_by_asc(publisher::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn create(
        &self,
        actor: &CurrentUser,
        input: PublisherInput,
    ) -> Result<publisher::Model, ServiceError> {
        if !policy::references::manage(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        self.validate(&input, None).await?;

        let now = Utc::now();
        let model = publisher::ActiveModel {
            name: Set(input.name.clone()),
            city: Set(input.city.clone()),
            country: Set(input.country.clone().unwrap_or_else(|| "Perú".to_string())),
            website: Set(input.website.clone()),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let publisher = model.insert(self.db).await?;
        info!(publisher_id = publisher.id, name = %publisher.name, "Publisher created");
        Ok(publisher)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: i32,
        input: PublisherInput,
    ) -> Result<publisher::Model, ServiceError> {
        if !policy::references::manage(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let publisher = self.find_alive(id).await?;
        self.validate(&input, Some(id)).await?;

        let mut model = publisher.into_active_model();
        model.name = Set(input.name.clone());
        model.city = Set(input.city.clone());
        if let Some(country) = input.country.clone() {
            model.country = Set(country);
        }
        model.website = Set(input.website.clone());
        if let Some(value) = input.is_active {
            model.is_active = Set(value);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(self.db).await?)
    }

    /// Soft delete. Books keep their publisher reference; the column is
    /// only cleared by the database when a row is physically removed.
    pub async fn delete(&self, actor: &CurrentUser, id: i32) -> Result<(), ServiceError> {
        if !policy::references::delete(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let publisher = self.find_alive(id).await?;

        let mut model = publisher.into_active_model();
        model.deleted_at = Set(Some(Utc::now().into()));
        model.update(self.db).await?;

        info!(publisher_id = id, "Publisher soft-deleted");
        Ok(())
    }

    async fn find_alive(&self, id: i32) -> Result<publisher::Model, ServiceError> {
        publisher::Entity::find_by_id(id)
            .filter(publisher::Column::DeletedAt.is_null())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Publisher {id}")))
    }

    async fn validate(
        &self,
        input: &PublisherInput,
        exclude_id: Option<i32>,
    ) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();

        validation::require(&mut errors, "name", &input.name, 255);

        if !input.name.trim().is_empty() {
            let mut query =
                publisher::Entity::find().filter(publisher::Column::Name.eq(&input.name));
            if let Some(id) = exclude_id {
                query = query.filter(publisher::Column::Id.ne(id));
            }
            if query.count(self.db).await? > 0 {
                errors.add("name", "The name has already been taken");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(errors))
        }
    }
}

// ============================================================================
// Languages
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageInput {
    /// Natural key; ignored on update
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub native_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub struct LanguageService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LanguageService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, actor: &CurrentUser) -> Result<Vec<language::Model>, ServiceError> {
        if !policy::references::view_any(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        Ok(language::Entity::find()
            .order_by_asc(language::Column::Name)
            .all(self.db)
            .await?)
    }

    pub async fn create(
        &self,
        actor: &CurrentUser,
        input: LanguageInput,
    ) -> Result<language::Model, ServiceError> {
        if !policy::references::manage(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let mut errors = FieldErrors::new();
        validation::require(&mut errors, "code", &input.code, 5);
        validation::require(&mut errors, "name", &input.name, 50);

        if !input.code.trim().is_empty() {
            let exists = language::Entity::find_by_id(input.code.clone())
                .count(self.db)
                .await?;
            if exists > 0 {
                errors.add("code", "The code has already been taken");
            }
        }

        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let now = Utc::now();
        let model = language::ActiveModel {
            code: Set(input.code.clone()),
            name: Set(input.name.clone()),
            native_name: Set(input.native_name.clone()),
            is_active: Set(input.is_active.unwrap_or(true)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let language = model.insert(self.db).await?;
        info!(code = %language.code, "Language created");
        Ok(language)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        code: &str,
        input: LanguageInput,
    ) -> Result<language::Model, ServiceError> {
        if !policy::references::manage(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let language = self.find(code).await?;

        let mut errors = FieldErrors::new();
        validation::require(&mut errors, "name", &input.name, 50);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let mut model = language.into_active_model();
        model.name = Set(input.name.clone());
        model.native_name = Set(input.native_name.clone());
        if let Some(value) = input.is_active {
            model.is_active = Set(value);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(self.db).await?)
    }

    /// Hard delete, refused while any live book still uses the language.
    pub async fn delete(&self, actor: &CurrentUser, code: &str) -> Result<(), ServiceError> {
        if !policy::references::delete(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let language = self.find(code).await?;

        let in_use = book::Entity::find()
            .filter(book::Column::LanguageCode.eq(code))
            .filter(book::Column::DeletedAt.is_null())
            .count(self.db)
            .await?;
        if in_use > 0 {
            return Err(ServiceError::BusinessRule(
                "Cannot delete a language that is assigned to books".to_string(),
            ));
        }

        language.delete(self.db).await?;

        info!(code = %code, "Language deleted");
        Ok(())
    }

    async fn find(&self, code: &str) -> Result<language::Model, ServiceError> {
        language::Entity::find_by_id(code.to_string())
            .one(self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Language '{code}'")))
    }
}
