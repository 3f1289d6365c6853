use sea_orm_migration::prelude::*;

/// Creates the `event_team` join table for event team assignment.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum EventTeam {
    Table,
    EventId,
    TeamId,
}

#[derive(DeriveIden)]
enum Event {
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
                    .table(EventTeam::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventTeam::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventTeam::TeamId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(EventTeam::EventId)
                            .col(EventTeam::TeamId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_team_event_id")
                            .from(EventTeam::Table, EventTeam::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_team_team_id")
                            .from(EventTeam::Table, EventTeam::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on team_id for "events involving my teams" lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_event_team_team_id")
                    .table(EventTeam::Table)
                    .col(EventTeam::TeamId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventTeam::Table).to_owned())
            .await
    }
}
