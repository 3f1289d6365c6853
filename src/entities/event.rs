use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A club event. `event_type` is one of `"tournament"`, `"league"`,
/// `"friendly"`, `"training"`; `status` follows the workflow validated in
/// the events route.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub sport_id: Uuid,
    pub event_date: Date,
    pub event_time: Time,
    pub location: String,
    pub event_type: String,
    pub status: String,
    pub result: Option<String>,
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
    #[sea_orm(has_many = "super::event_team::Entity")]
    EventTeams,
    #[sea_orm(has_many = "super::event_player::Entity")]
    EventPlayers,
    #[sea_orm(has_many = "super::performance::Entity")]
    Performances,
}

impl Related<super::sport::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sport.def()
    }
}

impl Related<super::event_team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventTeams.def()
    }
}

impl Related<super::event_player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventPlayers.def()
    }
}

impl Related<super::performance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Performances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
