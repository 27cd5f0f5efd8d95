use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Publishers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Publishers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Publishers::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Publishers::City).string())
                    .col(
                        ColumnDef::new(Publishers::Country)
                            .string()
                            .not_null()
                            .default("Perú"),
                    )
                    .col(ColumnDef::new(Publishers::Website).string())
                    .col(
                        ColumnDef::new(Publishers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Publishers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Publishers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Publishers::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Publishers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Publishers {
    Table,
    Id,
    Name,
    City,
    Country,
    Website,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
