use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookContributors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookContributors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookContributors::BookId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookContributors::ContributorType)
                            .string_len(16)
                            .not_null()
                            .default("author"),
                    )
                    .col(
                        ColumnDef::new(BookContributors::FullName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookContributors::Email).string_len(100))
                    .col(
                        ColumnDef::new(BookContributors::SequenceNumber)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(BookContributors::BiographicalNote).text())
                    .col(
                        ColumnDef::new(BookContributors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BookContributors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_contributors_book_id")
                            .from(BookContributors::Table, BookContributors::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Contributors are displayed ordered within their book
        manager
            .create_index(
                Index::create()
                    .name("idx_book_contributors_book_id_sequence_number")
                    .table(BookContributors::Table)
                    .col(BookContributors::BookId)
                    .col(BookContributors::SequenceNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_book_contributors_contributor_type")
                    .table(BookContributors::Table)
                    .col(BookContributors::ContributorType)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookContributors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BookContributors {
    Table,
    Id,
    BookId,
    ContributorType,
    FullName,
    Email,
    SequenceNumber,
    BiographicalNote,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
}
