use sea_orm_migration::prelude::*;

/// Creates the `sport` table. `icon` is a symbolic key the frontend maps to
/// an actual glyph; the API only stores the key.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Sport {
    Table,
    Id,
    Name,
    Category,
    Icon,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sport::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sport::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Sport::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Sport::Category).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Sport::Icon)
                            .string_len(50)
                            .not_null()
                            .default("trophy"),
                    )
                    .col(
                        ColumnDef::new(Sport::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sport::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sport::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sport::Table).to_owned())
            .await
    }
}
