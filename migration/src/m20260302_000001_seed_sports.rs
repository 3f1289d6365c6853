use sea_orm_migration::prelude::*;

/// Seeds the sport catalogue the club offers out of the box.
#[derive(DeriveMigrationName)]
pub struct Migration;

/// A single sport definition.
struct SportSeed {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    icon: &'static str,
}

#[rustfmt::skip]
const SPORTS: &[SportSeed] = &[
    // Team sports
    SportSeed { id: "01000000-0000-4000-8000-000000000001", name: "Football",     category: "team",       icon: "football" },
    SportSeed { id: "01000000-0000-4000-8000-000000000002", name: "Basketball",   category: "team",       icon: "basketball" },
    SportSeed { id: "01000000-0000-4000-8000-000000000003", name: "Cricket",      category: "team",       icon: "cricket" },
    SportSeed { id: "01000000-0000-4000-8000-000000000004", name: "Volleyball",   category: "team",       icon: "volleyball" },
    SportSeed { id: "01000000-0000-4000-8000-000000000005", name: "Hockey",       category: "team",       icon: "hockey" },
    // Individual sports
    SportSeed { id: "02000000-0000-4000-8000-000000000001", name: "Badminton",    category: "individual", icon: "shuttlecock" },
    SportSeed { id: "02000000-0000-4000-8000-000000000002", name: "Table Tennis", category: "individual", icon: "paddle" },
    SportSeed { id: "02000000-0000-4000-8000-000000000003", name: "Tennis",       category: "individual", icon: "tennis" },
    SportSeed { id: "02000000-0000-4000-8000-000000000004", name: "Athletics",    category: "individual", icon: "running" },
    SportSeed { id: "02000000-0000-4000-8000-000000000005", name: "Swimming",     category: "individual", icon: "swimming" },
    SportSeed { id: "02000000-0000-4000-8000-000000000006", name: "Chess",        category: "individual", icon: "chess" },
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for sport in SPORTS {
            let id = uuid::Uuid::parse_str(sport.id)
                .map_err(|e| DbErr::Custom(format!("Invalid seed UUID {}: {e}", sport.id)))?;

            let insert = Query::insert()
                .into_table(Sport::Table)
                .columns([
                    Sport::Id,
                    Sport::Name,
                    Sport::Category,
                    Sport::Icon,
                    Sport::IsActive,
                    Sport::CreatedAt,
                    Sport::UpdatedAt,
                ])
                .values_panic([
                    id.into(),
                    sport.name.into(),
                    sport.category.into(),
                    sport.icon.into(),
                    true.into(),
                    Expr::current_timestamp().into(),
                    Expr::current_timestamp().into(),
                ])
                .on_conflict(OnConflict::column(Sport::Id).do_nothing().to_owned())
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(Sport::Table).to_owned())
            .await
    }
}

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
