pub use sea_orm_migration::prelude::*;

mod m20250120_000001_create_languages;
mod m20250120_000002_create_publishers;
mod m20250120_000003_create_categories;
mod m20250120_000004_create_books;
mod m20250120_000005_create_book_category;
mod m20250120_000006_create_book_details;
mod m20250120_000007_create_book_contributors;
mod m20250120_000008_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250120_000001_create_languages::Migration),
            Box::new(m20250120_000002_create_publishers::Migration),
            Box::new(m20250120_000003_create_categories::Migration),
            Box::new(m20250120_000004_create_books::Migration),
            Box::new(m20250120_000005_create_book_category::Migration),
            Box::new(m20250120_000006_create_book_details::Migration),
            Box::new(m20250120_000007_create_book_contributors::Migration),
            Box::new(m20250120_000008_create_users::Migration),
        ]
    }
}
