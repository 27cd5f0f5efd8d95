//! Catalog-wide statistics for the staff dashboard.

use entity::{book, category, publisher, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::modules::auth::{policy, CurrentUser};

use super::ServiceError;

#[derive(Debug, Clone, Copy)]
pub struct DashboardStats {
    pub total_books: u64,
    pub active_books: u64,
    pub featured_books: u64,
    pub total_users: u64,
    pub active_users: u64,
    pub total_categories: u64,
    pub total_publishers: u64,
}

pub struct DashboardService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DashboardService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn stats(&self, actor: &CurrentUser) -> Result<DashboardStats, ServiceError> {
        if !policy::dashboard::view_stats(actor.role) {
            return Err(ServiceError::Forbidden);
        }

        let books = book::Entity::find().filter(book::Column::DeletedAt.is_null());
        let users = user::Entity::find().filter(user::Column::DeletedAt.is_null());

        Ok(DashboardStats {
            total_books: books.clone().count(self.db).await?,
            active_books: books
                .clone()
                .filter(book::Column::IsActive.eq(true))
                .count(self.db)
                .await?,
            featured_books: books
                .filter(book::Column::Featured.eq(true))
                .count(self.db)
                .await?,
            total_users: users.clone().count(self.db).await?,
            active_users: users
                .filter(user::Column::IsActive.eq(true))
                .count(self.db)
                .await?,
            total_categories: category::Entity::find()
                .filter(category::Column::DeletedAt.is_null())
                .count(self.db)
                .await?,
            total_publishers: publisher::Entity::find()
                .filter(publisher::Column::DeletedAt.is_null())
                .count(self.db)
                .await?,
        })
    }
}
