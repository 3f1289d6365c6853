use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::{AuthUser, StaffUser};
use crate::entities::{event_team, player, player_team, team, user};
use crate::error::AppError;
use crate::state::AppState;

/// Team gender divisions.
const GENDERS: &[&str] = &["men", "women", "mixed"];

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the team route group: `/teams/...` (staff writes, any-auth reads).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teams).post(create_team))
        .route(
            "/{id}",
            get(get_team).patch(update_team).delete(delete_team),
        )
        .route("/{id}/players", get(get_roster))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TeamResponse {
    id: Uuid,
    name: String,
    sport_id: Uuid,
    sport_name: Option<String>,
    gender: String,
    coach_id: Option<Uuid>,
    coach_name: Option<String>,
    founded_year: i32,
    is_active: bool,
    wins: i32,
    losses: i32,
    draws: i32,
    created_at: String,
    updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTeamRequest {
    name: String,
    sport_id: Uuid,
    gender: String,
    coach_id: Option<Uuid>,
    founded_year: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeamRequest {
    name: Option<String>,
    sport_id: Option<Uuid>,
    gender: Option<String>,
    // Double Option: absent = keep, null = unassign
    #[serde(default, with = "double_option")]
    coach_id: Option<Option<Uuid>>,
    founded_year: Option<i32>,
    is_active: Option<bool>,
    wins: Option<i32>,
    losses: Option<i32>,
    draws: Option<i32>,
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RosterPlayer {
    id: Uuid,
    user_id: Uuid,
    name: String,
    email: String,
    position: Option<String>,
    jersey_number: Option<i32>,
    joined_date: chrono::NaiveDate,
}

fn to_response(
    t: team::Model,
    sport_name: Option<String>,
    coach_name: Option<String>,
) -> TeamResponse {
    TeamResponse {
        id: t.id,
        name: t.name,
        sport_id: t.sport_id,
        sport_name,
        gender: t.gender,
        coach_id: t.coach_id,
        coach_name,
        founded_year: t.founded_year,
        is_active: t.is_active,
        wins: t.wins,
        losses: t.losses,
        draws: t.draws,
        created_at: t.created_at.to_rfc3339(),
        updated_at: t.updated_at.to_rfc3339(),
    }
}

fn validate_gender(gender: &str) -> Result<(), AppError> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Gender must be one of: men, women, mixed.".to_string(),
        ))
    }
}

fn validate_counter(value: i32, what: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::BadRequest(format!("{what} cannot be negative.")));
    }
    Ok(())
}

/// Check that `coach_id` names an active user with the coach role.
async fn validate_coach(db: &sea_orm::DatabaseConnection, coach_id: Uuid) -> Result<(), AppError> {
    let coach = user::Entity::find_by_id(coach_id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::BadRequest("Invalid coach selection.".to_string()))?;
    if coach.role != "coach" {
        return Err(AppError::BadRequest(
            "Selected user does not have the coach role.".to_string(),
        ));
    }
    Ok(())
}

async fn find_team(db: &sea_orm::DatabaseConnection, id: Uuid) -> Result<team::Model, AppError> {
    team::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Team not found.".to_string()))
}

/// Map `coach_id -> name` for the given teams.
async fn coach_names(
    db: &sea_orm::DatabaseConnection,
    teams: &[team::Model],
) -> Result<HashMap<Uuid, String>, AppError> {
    let coach_ids: Vec<Uuid> = teams.iter().filter_map(|t| t.coach_id).collect();
    if coach_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let coaches = user::Entity::find()
        .filter(user::Column::Id.is_in(coach_ids))
        .all(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(coaches.into_iter().map(|u| (u.id, u.name)).collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/teams` — newest first, with sport and coach names embedded.
async fn list_teams(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    let teams = team::Entity::find()
        .order_by_desc(team::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let coaches = coach_names(&state.db, &teams).await?;

    let mut out = Vec::with_capacity(teams.len());
    for t in teams {
        let sport_name = state
            .sports
            .get(&state.db, t.sport_id)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .map(|s| s.name);
        let coach_name = t.coach_id.and_then(|id| coaches.get(&id).cloned());
        out.push(to_response(t, sport_name, coach_name));
    }

    Ok(Json(out))
}

/// `POST /api/v1/teams`
async fn create_team(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Json(body): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), AppError> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }
    validate_gender(&body.gender)?;

    let sport_model = state
        .sports
        .get(&state.db, body.sport_id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::BadRequest("Invalid sport selection.".to_string()))?;

    if let Some(coach_id) = body.coach_id {
        validate_coach(&state.db, coach_id).await?;
    }

    let now = Utc::now().fixed_offset();
    let new_team = team::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        sport_id: Set(body.sport_id),
        gender: Set(body.gender),
        coach_id: Set(body.coach_id),
        founded_year: Set(body.founded_year),
        is_active: Set(true),
        wins: Set(0),
        losses: Set(0),
        draws: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = new_team
        .insert(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Team"))?;

    let coaches = coach_names(&state.db, std::slice::from_ref(&inserted)).await?;
    let coach_name = inserted.coach_id.and_then(|id| coaches.get(&id).cloned());
    Ok((
        StatusCode::CREATED,
        Json(to_response(inserted, Some(sport_model.name), coach_name)),
    ))
}

/// `GET /api/v1/teams/{id}`
async fn get_team(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, AppError> {
    let team_model = find_team(&state.db, id).await?;

    let sport_name = state
        .sports
        .get(&state.db, team_model.sport_id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map(|s| s.name);
    let coaches = coach_names(&state.db, std::slice::from_ref(&team_model)).await?;
    let coach_name = team_model.coach_id.and_then(|id| coaches.get(&id).cloned());

    Ok(Json(to_response(team_model, sport_name, coach_name)))
}

/// `PATCH /api/v1/teams/{id}`
async fn update_team(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    let team_model = find_team(&state.db, id).await?;

    if let Some(ref gender) = body.gender {
        validate_gender(gender)?;
    }
    if let Some(sport_id) = body.sport_id {
        state
            .sports
            .get(&state.db, sport_id)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .ok_or_else(|| AppError::BadRequest("Invalid sport selection.".to_string()))?;
    }
    if let Some(Some(coach_id)) = body.coach_id {
        validate_coach(&state.db, coach_id).await?;
    }
    for (value, label) in [
        (body.wins, "Wins"),
        (body.losses, "Losses"),
        (body.draws, "Draws"),
    ] {
        if let Some(v) = value {
            validate_counter(v, label)?;
        }
    }

    let mut active: team::ActiveModel = team_model.into();
    if let Some(name) = body.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::BadRequest("Name cannot be empty.".to_string()));
        }
        active.name = Set(name);
    }
    if let Some(sport_id) = body.sport_id {
        active.sport_id = Set(sport_id);
    }
    if let Some(gender) = body.gender {
        active.gender = Set(gender);
    }
    if let Some(coach_id) = body.coach_id {
        active.coach_id = Set(coach_id);
    }
    if let Some(founded_year) = body.founded_year {
        active.founded_year = Set(founded_year);
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(wins) = body.wins {
        active.wins = Set(wins);
    }
    if let Some(losses) = body.losses {
        active.losses = Set(losses);
    }
    if let Some(draws) = body.draws {
        active.draws = Set(draws);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Team"))?;

    let sport_name = state
        .sports
        .get(&state.db, updated.sport_id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map(|s| s.name);
    let coaches = coach_names(&state.db, std::slice::from_ref(&updated)).await?;
    let coach_name = updated.coach_id.and_then(|id| coaches.get(&id).cloned());

    Ok(Json(to_response(updated, sport_name, coach_name)))
}

/// `DELETE /api/v1/teams/{id}`
///
/// Refused while roster memberships or event assignments still reference the
/// team; the store's RESTRICT backs up both checks.
async fn delete_team(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let team_model = find_team(&state.db, id).await?;

    let rostered = player_team::Entity::find()
        .filter(player_team::Column::TeamId.eq(id))
        .count(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if rostered > 0 {
        return Err(AppError::Conflict(format!(
            "Team '{}' is still in use by {rostered} player(s). \
             Remove them from the roster first.",
            team_model.name
        )));
    }

    let assigned = event_team::Entity::find()
        .filter(event_team::Column::TeamId.eq(id))
        .count(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if assigned > 0 {
        return Err(AppError::Conflict(format!(
            "Team '{}' is still in use by {assigned} event(s). \
             Unassign it from those events first.",
            team_model.name
        )));
    }

    team::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Team"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/teams/{id}/players` — active roster.
///
/// A player is counted only when both sides of the join are active: the
/// membership row and the player profile itself.
async fn get_roster(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RosterPlayer>>, AppError> {
    find_team(&state.db, id).await?;

    let memberships = player_team::Entity::find()
        .filter(player_team::Column::TeamId.eq(id))
        .filter(player_team::Column::IsActive.eq(true))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    if memberships.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let joined: HashMap<Uuid, chrono::NaiveDate> = memberships
        .iter()
        .map(|m| (m.player_id, m.joined_date))
        .collect();

    let players = player::Entity::find()
        .filter(player::Column::Id.is_in(joined.keys().copied().collect::<Vec<_>>()))
        .filter(player::Column::IsActive.eq(true))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(players.iter().map(|p| p.user_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let users: HashMap<Uuid, user::Model> = users.into_iter().map(|u| (u.id, u)).collect();

    let roster = players
        .into_iter()
        .filter_map(|p| {
            let u = users.get(&p.user_id)?;
            let joined_date = joined.get(&p.id).copied()?;
            Some(RosterPlayer {
                id: p.id,
                user_id: p.user_id,
                name: u.name.clone(),
                email: u.email.clone(),
                position: p.position,
                jersey_number: p.jersey_number,
                joined_date,
            })
        })
        .collect();

    Ok(Json(roster))
}
