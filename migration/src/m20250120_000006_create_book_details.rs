use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookDetails::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookDetails::BookId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(BookDetails::Description).text())
                    .col(ColumnDef::new(BookDetails::Edition).string())
                    .col(ColumnDef::new(BookDetails::FileFormat).string())
                    .col(ColumnDef::new(BookDetails::FileSize).big_integer())
                    .col(ColumnDef::new(BookDetails::ReadingAge).string())
                    .col(ColumnDef::new(BookDetails::Restrictions).text())
                    .col(ColumnDef::new(BookDetails::Notes).text())
                    .col(
                        ColumnDef::new(BookDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BookDetails::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_book_details_book_id")
                            .from(BookDetails::Table, BookDetails::BookId)
                            .to(Books::Table, Books::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookDetails::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BookDetails {
    Table,
    Id,
    BookId,
    Description,
    Edition,
    FileFormat,
    FileSize,
    ReadingAge,
    Restrictions,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Books {
    Table,
    Id,
}
