use sea_orm_migration::prelude::*;

/// Creates the `event` table. `status` follows the workflow
/// scheduled -> ongoing -> completed, with cancellation from the two
/// non-terminal states; transitions are validated in the application.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Event {
    Table,
    Id,
    Name,
    SportId,
    EventDate,
    EventTime,
    Location,
    EventType,
    Status,
    Result,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sport {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Event::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Event::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Event::SportId).uuid().not_null())
                    .col(ColumnDef::new(Event::EventDate).date().not_null())
                    .col(ColumnDef::new(Event::EventTime).time().not_null())
                    .col(ColumnDef::new(Event::Location).string_len(200).not_null())
                    .col(ColumnDef::new(Event::EventType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Event::Status)
                            .string_len(20)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(ColumnDef::new(Event::Result).string_len(500).null())
                    .col(
                        ColumnDef::new(Event::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Event::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_sport_id")
                            .from(Event::Table, Event::SportId)
                            .to(Sport::Table, Sport::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_event_sport_id")
                    .table(Event::Table)
                    .col(Event::SportId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}
