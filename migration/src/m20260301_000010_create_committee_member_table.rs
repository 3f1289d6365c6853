use sea_orm_migration::prelude::*;

/// Creates the `committee_member` table for committee tenure records.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum CommitteeMember {
    Table,
    Id,
    UserId,
    Position,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
    UpdatedAt,
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
                    .table(CommitteeMember::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CommitteeMember::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CommitteeMember::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(CommitteeMember::Position)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CommitteeMember::StartDate).date().not_null())
                    .col(ColumnDef::new(CommitteeMember::EndDate).date().null())
                    .col(
                        ColumnDef::new(CommitteeMember::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CommitteeMember::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CommitteeMember::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_committee_member_user_id")
                            .from(CommitteeMember::Table, CommitteeMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_committee_member_user_id")
                    .table(CommitteeMember::Table)
                    .col(CommitteeMember::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommitteeMember::Table).to_owned())
            .await
    }
}
