//! Migration for the books table.
//!
//! Carries the bibliographic fields, uploaded file paths, denormalized
//! usage counters and the access/copyright enumerations (stored as
//! strings so the schema is portable across Postgres and SQLite).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Books::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Books::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Books::Title).string().not_null())
                    .col(
                        ColumnDef::new(Books::Isbn)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Books::Slug)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Books::PublisherId).integer())
                    .col(
                        ColumnDef::new(Books::LanguageCode)
                            .string_len(5)
                            .not_null()
                            .default("es"),
                    )
                    .col(ColumnDef::new(Books::Pages).integer())
                    .col(ColumnDef::new(Books::PublicationYear).integer())
                    .col(ColumnDef::new(Books::CoverImage).string())
                    .col(ColumnDef::new(Books::PdfFile).string())
                    .col(
                        ColumnDef::new(Books::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Books::Downloadable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Books::BookType)
                            .string_len(16)
                            .not_null()
                            .default("digital"),
                    )
                    .col(
                        ColumnDef::new(Books::TotalDownloads)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::TotalPhysicalCopies)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::AvailablePhysicalCopies)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::TotalLoans)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::TotalViews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Books::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Books::AccessLevel)
                            .string_len(16)
                            .not_null()
                            .default("free"),
                    )
                    .col(
                        ColumnDef::new(Books::CopyrightStatus)
                            .string_len(20)
                            .not_null()
                            .default("copyrighted"),
                    )
                    .col(ColumnDef::new(Books::LicenseType).string())
                    .col(ColumnDef::new(Books::PublishedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Books::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Books::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Books::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_books_publisher_id")
                            .from(Books::Table, Books::PublisherId)
                            .to(Publishers::Table, Publishers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_books_language_code")
                            .from(Books::Table, Books::LanguageCode)
                            .to(Languages::Table, Languages::Code)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_featured_is_active")
                    .table(Books::Table)
                    .col(Books::Featured)
                    .col(Books::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_is_active_published_at")
                    .table(Books::Table)
                    .col(Books::IsActive)
                    .col(Books::PublishedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_book_type")
                    .table(Books::Table)
                    .col(Books::BookType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_books_access_level")
                    .table(Books::Table)
                    .col(Books::AccessLevel)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Books::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
    Title,
    Isbn,
    Slug,
    PublisherId,
    LanguageCode,
    Pages,
    PublicationYear,
    CoverImage,
    PdfFile,
    IsActive,
    Downloadable,
    BookType,
    TotalDownloads,
    TotalPhysicalCopies,
    AvailablePhysicalCopies,
    TotalLoans,
    TotalViews,
    Featured,
    AccessLevel,
    CopyrightStatus,
    LicenseType,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Publishers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Languages {
    Table,
    Code,
}
