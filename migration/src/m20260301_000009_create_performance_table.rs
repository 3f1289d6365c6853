use sea_orm_migration::prelude::*;

/// Creates the `performance` table.
///
/// Exactly one of `player_id` / `team_id` is set per row (individual vs.
/// team performance); the XOR is validated in the application since the
/// constraint cannot be expressed portably across both backends.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Performance {
    Table,
    Id,
    EventId,
    PlayerId,
    TeamId,
    Score,
    Position,
    Notes,
    Metrics,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Event {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Player {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Team {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Performance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Performance::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Performance::EventId).uuid().not_null())
                    .col(ColumnDef::new(Performance::PlayerId).uuid().null())
                    .col(ColumnDef::new(Performance::TeamId).uuid().null())
                    .col(ColumnDef::new(Performance::Score).double().null())
                    .col(ColumnDef::new(Performance::Position).integer().null())
                    .col(ColumnDef::new(Performance::Notes).text().null())
                    .col(ColumnDef::new(Performance::Metrics).json_binary().not_null())
                    .col(
                        ColumnDef::new(Performance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Performance::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_event_id")
                            .from(Performance::Table, Performance::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_player_id")
                            .from(Performance::Table, Performance::PlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_team_id")
                            .from(Performance::Table, Performance::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_performance_event_id")
                    .table(Performance::Table)
                    .col(Performance::EventId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Performance::Table).to_owned())
            .await
    }
}
