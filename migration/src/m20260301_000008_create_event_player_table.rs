use sea_orm_migration::prelude::*;

/// Creates the `event_player` join table for participant selection.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum EventPlayer {
    Table,
    EventId,
    PlayerId,
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

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventPlayer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventPlayer::EventId).uuid().not_null())
                    .col(ColumnDef::new(EventPlayer::PlayerId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(EventPlayer::EventId)
                            .col(EventPlayer::PlayerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_player_event_id")
                            .from(EventPlayer::Table, EventPlayer::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_player_player_id")
                            .from(EventPlayer::Table, EventPlayer::PlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_player_player_id")
                    .table(EventPlayer::Table)
                    .col(EventPlayer::PlayerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventPlayer::Table).to_owned())
            .await
    }
}
