use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A club member account. `role` is one of `"admin"`, `"committee"`,
/// `"coach"`, `"player"`; `password_hash` is `None` for roster-only accounts
/// that cannot sign in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::player::Entity")]
    Player,
    #[sea_orm(has_many = "super::committee_member::Entity")]
    CommitteeMember,
    #[sea_orm(has_many = "super::team::Entity")]
    CoachedTeams,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl Related<super::committee_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommitteeMember.def()
    }
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoachedTeams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
