pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_user_table;
mod m20260301_000002_create_sport_table;
mod m20260301_000003_create_team_table;
mod m20260301_000004_create_player_table;
mod m20260301_000005_create_player_team_table;
mod m20260301_000006_create_event_table;
mod m20260301_000007_create_event_team_table;
mod m20260301_000008_create_event_player_table;
mod m20260301_000009_create_performance_table;
mod m20260301_000010_create_committee_member_table;
mod m20260302_000001_seed_sports;
mod m20260302_000002_seed_admin_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_user_table::Migration),
            Box::new(m20260301_000002_create_sport_table::Migration),
            Box::new(m20260301_000003_create_team_table::Migration),
            Box::new(m20260301_000004_create_player_table::Migration),
            Box::new(m20260301_000005_create_player_team_table::Migration),
            Box::new(m20260301_000006_create_event_table::Migration),
            Box::new(m20260301_000007_create_event_team_table::Migration),
            Box::new(m20260301_000008_create_event_player_table::Migration),
            Box::new(m20260301_000009_create_performance_table::Migration),
            Box::new(m20260301_000010_create_committee_member_table::Migration),
            Box::new(m20260302_000001_seed_sports::Migration),
            Box::new(m20260302_000002_seed_admin_user::Migration),
        ]
    }
}
