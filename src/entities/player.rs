use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A player profile; exactly one per user account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "player")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
    pub date_joined: Date,
    pub is_active: bool,
    pub matches_played: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub personal_best: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::player_team::Entity")]
    PlayerTeams,
    #[sea_orm(has_many = "super::event_player::Entity")]
    EventPlayers,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::player_team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayerTeams.def()
    }
}

impl Related<super::event_player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventPlayers.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        super::player_team::Relation::Team.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::player_team::Relation::Player.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
