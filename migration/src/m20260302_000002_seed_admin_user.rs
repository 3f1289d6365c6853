use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use rand::rngs::OsRng;
use sea_orm_migration::prelude::*;

/// Seeds the bootstrap admin account.
///
/// Credentials come from `ADMIN_EMAIL` / `ADMIN_PASSWORD`; the defaults are
/// for development only and should be overridden in any real deployment.
#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_ADMIN_EMAIL: &str = "admin@clubdesk.local";
const DEFAULT_ADMIN_PASSWORD: &str = "clubdesk-admin";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let email = std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string())
            .to_lowercase();
        let password =
            std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DbErr::Custom(format!("Failed to hash admin password: {e}")))?
            .to_string();

        let insert = Query::insert()
            .into_table(User::Table)
            .columns([
                User::Id,
                User::Email,
                User::Name,
                User::Role,
                User::PasswordHash,
                User::IsActive,
                User::CreatedAt,
                User::UpdatedAt,
            ])
            .values_panic([
                uuid::Uuid::new_v4().into(),
                email.clone().into(),
                "Club Administrator".into(),
                "admin".into(),
                password_hash.into(),
                true.into(),
                Expr::current_timestamp().into(),
                Expr::current_timestamp().into(),
            ])
            .on_conflict(OnConflict::column(User::Email).do_nothing().to_owned())
            .to_owned();

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let email = std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string())
            .to_lowercase();

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(User::Table)
                    .and_where(Expr::col(User::Email).eq(email))
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Email,
    Name,
    Role,
    PasswordHash,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
