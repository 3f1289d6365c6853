//! Many-to-many relationship reconciliation.
//!
//! One engine drives every join table in the system: given an owning record
//! and a desired set of related ids, make the join table's rows for that
//! owner exactly match the desired set. The operation is a full replace, not
//! a diff: delete everything for the owner, then insert the desired rows.
//!
//! The two steps are separate statements by contract. The delete is awaited
//! to completion before the insert is issued, and if the insert fails the
//! delete is NOT rolled back: the owner is left with zero links and the
//! caller receives a partial-write error. A concurrent reader between the
//! two steps sees a temporarily empty relationship set; this race is
//! accepted for the low-write-concurrency admin workflows this API serves.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{event_player, event_team, player, player_team, team};
use crate::error::AppError;

/// A join table the reconciliation engine can drive.
pub trait JoinTable {
    /// The join entity being reconciled.
    type Entity: EntityTrait;

    /// Name of the related record kind, used in error messages.
    const RELATED: &'static str;

    /// Column holding the owning record's id.
    fn owner_column() -> <Self::Entity as EntityTrait>::Column;

    /// Related id carried by a join row.
    fn related_id(row: <Self::Entity as EntityTrait>::Model) -> Uuid;

    /// Build a join row linking `owner_id` to `related_id`.
    fn link(owner_id: Uuid, related_id: Uuid) -> <Self::Entity as EntityTrait>::ActiveModel;

    /// Whether every id in `ids` exists in the related table.
    fn all_exist(
        db: &DatabaseConnection,
        ids: &[Uuid],
    ) -> impl Future<Output = Result<bool, DbErr>> + Send;
}

/// Replace the join rows for `owner_id` so they exactly match `desired`.
///
/// After success the join table contains exactly `{(owner_id, id) : id in
/// desired}`. An empty `desired` is a valid terminal state ("unassign all").
/// Calling twice with the same set yields the same final rows.
///
/// # Errors
///
/// - `BadRequest` if `desired` names an id the related table does not have.
///   This is detected after the delete, so the owner's relationships are
///   already empty when it surfaces, per the full-replace contract.
/// - `PartialWrite` if the insert fails after the delete committed.
pub async fn replace_links<J: JoinTable>(
    db: &DatabaseConnection,
    owner_id: Uuid,
    desired: &[Uuid],
) -> Result<(), AppError> {
    // Duplicate pairs would violate the composite primary key
    let mut seen = HashSet::new();
    let desired: Vec<Uuid> = desired
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    // Step 1: drop whatever exists for this owner. Must complete before the
    // insert is issued; issuing them concurrently could let the new rows be
    // deleted by this statement.
    J::Entity::delete_many()
        .filter(J::owner_column().eq(owner_id))
        .exec(db)
        .await
        .map_err(|e| AppError::from_db(e, "Relationship"))?;

    if desired.is_empty() {
        return Ok(());
    }

    // Unknown ids fail the insert step. The delete has already committed, so
    // the owner is left with zero links; no rollback is attempted.
    let all_exist = J::all_exist(db, &desired)
        .await
        .map_err(|e| AppError::from_db(e, "Relationship"))?;
    if !all_exist {
        return Err(AppError::BadRequest(format!(
            "One or more {} ids do not exist.",
            J::RELATED
        )));
    }

    // Step 2: insert the desired rows in one statement.
    let rows = desired.iter().map(|id| J::link(owner_id, *id));
    J::Entity::insert_many(rows).exec(db).await.map_err(|e| {
        tracing::error!(owner_id = %owner_id, "Join insert failed after delete: {e}");
        AppError::PartialWrite(format!(
            "Existing {} links were removed but the new links could not be written; \
             the relationship set for this record is now empty. Resubmit to repair it.",
            J::RELATED
        ))
    })?;

    Ok(())
}

/// Current related-id set for `owner_id`. Order carries no meaning.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn linked_ids<J: JoinTable>(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<Uuid>, AppError> {
    let rows = J::Entity::find()
        .filter(J::owner_column().eq(owner_id))
        .all(db)
        .await
        .map_err(|e| AppError::from_db(e, "Relationship"))?;

    Ok(rows.into_iter().map(J::related_id).collect())
}

/// Teams assigned to an event.
pub struct EventTeams;

impl JoinTable for EventTeams {
    type Entity = event_team::Entity;

    const RELATED: &'static str = "team";

    fn owner_column() -> event_team::Column {
        event_team::Column::EventId
    }

    fn related_id(row: event_team::Model) -> Uuid {
        row.team_id
    }

    fn link(owner_id: Uuid, related_id: Uuid) -> event_team::ActiveModel {
        event_team::ActiveModel {
            event_id: Set(owner_id),
            team_id: Set(related_id),
        }
    }

    async fn all_exist(db: &DatabaseConnection, ids: &[Uuid]) -> Result<bool, DbErr> {
        let found = team::Entity::find()
            .filter(team::Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await?;
        Ok(found.len() == ids.len())
    }
}

/// Players selected for an event.
pub struct EventPlayers;

impl JoinTable for EventPlayers {
    type Entity = event_player::Entity;

    const RELATED: &'static str = "player";

    fn owner_column() -> event_player::Column {
        event_player::Column::EventId
    }

    fn related_id(row: event_player::Model) -> Uuid {
        row.player_id
    }

    fn link(owner_id: Uuid, related_id: Uuid) -> event_player::ActiveModel {
        event_player::ActiveModel {
            event_id: Set(owner_id),
            player_id: Set(related_id),
        }
    }

    async fn all_exist(db: &DatabaseConnection, ids: &[Uuid]) -> Result<bool, DbErr> {
        let found = player::Entity::find()
            .filter(player::Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await?;
        Ok(found.len() == ids.len())
    }
}

/// Teams a player is rostered on.
pub struct PlayerTeams;

impl JoinTable for PlayerTeams {
    type Entity = player_team::Entity;

    const RELATED: &'static str = "team";

    fn owner_column() -> player_team::Column {
        player_team::Column::PlayerId
    }

    fn related_id(row: player_team::Model) -> Uuid {
        row.team_id
    }

    fn link(owner_id: Uuid, related_id: Uuid) -> player_team::ActiveModel {
        player_team::ActiveModel {
            player_id: Set(owner_id),
            team_id: Set(related_id),
            is_active: Set(true),
            joined_date: Set(Utc::now().date_naive()),
        }
    }

    async fn all_exist(db: &DatabaseConnection, ids: &[Uuid]) -> Result<bool, DbErr> {
        let found = team::Entity::find()
            .filter(team::Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await?;
        Ok(found.len() == ids.len())
    }
}

/// Unassign every team currently coached by `coach_id`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub async fn clear_coach_teams(db: &DatabaseConnection, coach_id: Uuid) -> Result<(), AppError> {
    team::Entity::update_many()
        .col_expr(team::Column::CoachId, Expr::value(None::<Uuid>))
        .filter(team::Column::CoachId.eq(coach_id))
        .exec(db)
        .await
        .map_err(|e| AppError::from_db(e, "Team"))?;
    Ok(())
}

/// Make `coach_id` coach exactly the teams in `team_ids`.
///
/// Coach assignment is a single nullable FK on `team`, not a join table, so
/// this is a clear-then-set column pair rather than a row reconciliation:
/// clear the column on every team the coach currently has, then set it on
/// the desired teams.
///
/// # Errors
///
/// Returns `BadRequest` if a team id does not exist, or a classified
/// database error if either update fails.
pub async fn assign_coach_teams(
    db: &DatabaseConnection,
    coach_id: Uuid,
    team_ids: &[Uuid],
) -> Result<(), AppError> {
    let found = team::Entity::find()
        .filter(team::Column::Id.is_in(team_ids.to_vec()))
        .all(db)
        .await
        .map_err(|e| AppError::from_db(e, "Team"))?;
    if found.len() != team_ids.len() {
        return Err(AppError::BadRequest(
            "One or more team ids do not exist.".to_string(),
        ));
    }

    clear_coach_teams(db, coach_id).await?;

    if team_ids.is_empty() {
        return Ok(());
    }

    team::Entity::update_many()
        .col_expr(team::Column::CoachId, Expr::value(Some(coach_id)))
        .filter(team::Column::Id.is_in(team_ids.to_vec()))
        .exec(db)
        .await
        .map_err(|e| {
            tracing::error!(coach_id = %coach_id, "Coach assignment failed after clear: {e}");
            AppError::PartialWrite(
                "Existing coach assignments were cleared but the new assignments could not \
                 be written. Resubmit to repair them."
                    .to_string(),
            )
        })?;

    Ok(())
}
