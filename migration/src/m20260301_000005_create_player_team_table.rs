use sea_orm_migration::prelude::*;

/// Creates the `player_team` join table for roster membership.
///
/// The composite primary key enforces the no-duplicate-(player, team)
/// invariant at the store level. `team_id` is RESTRICT so a team with
/// rostered players cannot be hard-deleted.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum PlayerTeam {
    Table,
    PlayerId,
    TeamId,
    IsActive,
    JoinedDate,
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
                    .table(PlayerTeam::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlayerTeam::PlayerId).uuid().not_null())
                    .col(ColumnDef::new(PlayerTeam::TeamId).uuid().not_null())
                    .col(
                        ColumnDef::new(PlayerTeam::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(PlayerTeam::JoinedDate).date().not_null())
                    .primary_key(
                        Index::create()
                            .col(PlayerTeam::PlayerId)
                            .col(PlayerTeam::TeamId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_team_player_id")
                            .from(PlayerTeam::Table, PlayerTeam::PlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_team_team_id")
                            .from(PlayerTeam::Table, PlayerTeam::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on team_id for roster lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_player_team_team_id")
                    .table(PlayerTeam::Table)
                    .col(PlayerTeam::TeamId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlayerTeam::Table).to_owned())
            .await
    }
}
