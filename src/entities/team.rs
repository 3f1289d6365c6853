use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A club team. At most one coach at a time (single nullable FK); the
/// win/loss/draw counters are maintained by staff edits, not derived.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub sport_id: Uuid,
    pub gender: String,
    pub coach_id: Option<Uuid>,
    pub founded_year: i32,
    pub is_active: bool,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sport::Entity",
        from = "Column::SportId",
        to = "super::sport::Column::Id"
    )]
    Sport,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CoachId",
        to = "super::user::Column::Id"
    )]
    Coach,
    #[sea_orm(has_many = "super::player_team::Entity")]
    PlayerTeams,
    #[sea_orm(has_many = "super::event_team::Entity")]
    EventTeams,
}

impl Related<super::sport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sport.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coach.def()
    }
}

impl Related<super::player_team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerTeams.def()
    }
}

impl Related<super::event_team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventTeams.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        super::player_team::Relation::Player.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::player_team::Relation::Team.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
