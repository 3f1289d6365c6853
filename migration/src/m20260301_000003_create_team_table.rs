use sea_orm_migration::prelude::*;

/// Creates the `team` table.
///
/// `sport_id` is RESTRICT so a sport still referenced by teams cannot be
/// deleted out from under them; `coach_id` is SET NULL so removing a coach
/// account never leaves a dangling reference.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
    Name,
    SportId,
    Gender,
    CoachId,
    FoundedYear,
    IsActive,
    Wins,
    Losses,
    Draws,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sport {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Team::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Team::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Team::SportId).uuid().not_null())
                    .col(ColumnDef::new(Team::Gender).string_len(10).not_null())
                    .col(ColumnDef::new(Team::CoachId).uuid().null())
                    .col(ColumnDef::new(Team::FoundedYear).integer().not_null())
                    .col(
                        ColumnDef::new(Team::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Team::Wins).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Team::Losses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Team::Draws).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Team::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Team::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_sport_id")
                            .from(Team::Table, Team::SportId)
                            .to(Sport::Table, Sport::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_coach_id")
                            .from(Team::Table, Team::CoachId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_coach_id")
                    .table(Team::Table)
                    .col(Team::CoachId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_team_sport_id")
                    .table(Team::Table)
                    .col(Team::SportId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await
    }
}
