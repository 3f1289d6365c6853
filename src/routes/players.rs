use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::{AuthUser, StaffUser};
use crate::entities::{player, player_team, team, user};
use crate::error::AppError;
use crate::services::reconcile::{self, PlayerTeams};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the player route group: `/players/...` (staff writes, any-auth reads).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_players).post(create_player))
        .route(
            "/{id}",
            get(get_player).patch(update_player).delete(delete_player),
        )
        .route("/{id}/teams", get(get_player_teams).put(set_player_teams))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    id: Uuid,
    user_id: Uuid,
    name: Option<String>,
    email: Option<String>,
    position: Option<String>,
    jersey_number: Option<i32>,
    date_joined: NaiveDate,
    is_active: bool,
    matches_played: i32,
    wins: i32,
    losses: i32,
    draws: i32,
    personal_best: Option<String>,
    team_ids: Vec<Uuid>,
    team_names: Vec<String>,
    created_at: String,
    updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePlayerRequest {
    user_id: Uuid,
    position: Option<String>,
    jersey_number: Option<i32>,
    date_joined: Option<NaiveDate>,
    team_ids: Vec<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePlayerRequest {
    position: Option<String>,
    jersey_number: Option<i32>,
    date_joined: Option<NaiveDate>,
    is_active: Option<bool>,
    matches_played: Option<i32>,
    wins: Option<i32>,
    losses: Option<i32>,
    draws: Option<i32>,
    personal_best: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetPlayerTeamsRequest {
    team_ids: Vec<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerTeamsResponse {
    team_ids: Vec<Uuid>,
}

fn to_response(
    p: player::Model,
    account: Option<&user::Model>,
    team_ids: Vec<Uuid>,
    team_names: Vec<String>,
) -> PlayerResponse {
    PlayerResponse {
        id: p.id,
        user_id: p.user_id,
        name: account.map(|u| u.name.clone()),
        email: account.map(|u| u.email.clone()),
        position: p.position,
        jersey_number: p.jersey_number,
        date_joined: p.date_joined,
        is_active: p.is_active,
        matches_played: p.matches_played,
        wins: p.wins,
        losses: p.losses,
        draws: p.draws,
        personal_best: p.personal_best,
        team_ids,
        team_names,
        created_at: p.created_at.to_rfc3339(),
        updated_at: p.updated_at.to_rfc3339(),
    }
}

fn validate_counter(value: i32, what: &str) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::BadRequest(format!("{what} cannot be negative.")));
    }
    Ok(())
}

async fn find_player(
    db: &sea_orm::DatabaseConnection,
    id: Uuid,
) -> Result<player::Model, AppError> {
    player::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Player not found.".to_string()))
}

/// Assemble the full response for one player: account plus current teams.
async fn load_response(
    db: &sea_orm::DatabaseConnection,
    p: player::Model,
) -> Result<PlayerResponse, AppError> {
    let account = user::Entity::find_by_id(p.user_id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let team_ids = reconcile::linked_ids::<PlayerTeams>(db, p.id).await?;
    let teams = team::Entity::find()
        .filter(team::Column::Id.is_in(team_ids.clone()))
        .all(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let names: HashMap<Uuid, String> = teams.into_iter().map(|t| (t.id, t.name)).collect();
    let team_names = team_ids
        .iter()
        .filter_map(|id| names.get(id).cloned())
        .collect();

    Ok(to_response(p, account.as_ref(), team_ids, team_names))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/players` — newest first, with account and team names embedded.
async fn list_players(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<PlayerResponse>>, AppError> {
    let players = player::Entity::find()
        .order_by_desc(player::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let accounts = user::Entity::find()
        .filter(user::Column::Id.is_in(players.iter().map(|p| p.user_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let accounts: HashMap<Uuid, user::Model> = accounts.into_iter().map(|u| (u.id, u)).collect();

    let memberships = player_team::Entity::find()
        .filter(player_team::Column::PlayerId.is_in(players.iter().map(|p| p.id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let teams = team::Entity::find()
        .filter(team::Column::Id.is_in(memberships.iter().map(|m| m.team_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let team_names: HashMap<Uuid, String> = teams.into_iter().map(|t| (t.id, t.name)).collect();

    let mut by_player: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for m in memberships {
        by_player.entry(m.player_id).or_default().push(m.team_id);
    }

    let out = players
        .into_iter()
        .map(|p| {
            let ids = by_player.remove(&p.id).unwrap_or_default();
            let names = ids
                .iter()
                .filter_map(|id| team_names.get(id).cloned())
                .collect();
            let account = accounts.get(&p.user_id);
            to_response(p, account, ids, names)
        })
        .collect();

    Ok(Json(out))
}

/// `POST /api/v1/players`
///
/// A new player must land on at least one team. The profile row is inserted
/// first, then the roster links are written by the same full-replace engine
/// the edit flow uses. If the link write fails here, the just-created profile
/// is deleted again so no orphan player is left behind; the failure still
/// surfaces to the caller.
async fn create_player(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Json(body): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), AppError> {
    if body.team_ids.is_empty() {
        return Err(AppError::BadRequest(
            "A player must be assigned to at least one team.".to_string(),
        ));
    }

    user::Entity::find_by_id(body.user_id)
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::BadRequest("Invalid user selection.".to_string()))?;

    // One profile per account; the unique constraint backs this up on a race
    let existing = player::Entity::find()
        .filter(player::Column::UserId.eq(body.user_id))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A player profile already exists for this user.".to_string(),
        ));
    }

    let now = Utc::now().fixed_offset();
    let new_player = player::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(body.user_id),
        position: Set(body.position),
        jersey_number: Set(body.jersey_number),
        date_joined: Set(body.date_joined.unwrap_or_else(|| Utc::now().date_naive())),
        is_active: Set(true),
        matches_played: Set(0),
        wins: Set(0),
        losses: Set(0),
        draws: Set(0),
        personal_best: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = new_player
        .insert(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "A player profile for this user"))?;

    if let Err(err) = reconcile::replace_links::<PlayerTeams>(&state.db, inserted.id, &body.team_ids).await
    {
        // Compensate: the profile only just came into existence, so take it
        // back out rather than leave an unrosterable orphan.
        if let Err(cleanup) = player::Entity::delete_by_id(inserted.id).exec(&state.db).await {
            tracing::error!(player_id = %inserted.id, "Compensating delete failed: {cleanup}");
        }
        return Err(err);
    }

    let response = load_response(&state.db, inserted).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/v1/players/{id}`
async fn get_player(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerResponse>, AppError> {
    let player_model = find_player(&state.db, id).await?;
    Ok(Json(load_response(&state.db, player_model).await?))
}

/// `PATCH /api/v1/players/{id}`
async fn update_player(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    let player_model = find_player(&state.db, id).await?;

    for (value, label) in [
        (body.matches_played, "Matches played"),
        (body.wins, "Wins"),
        (body.losses, "Losses"),
        (body.draws, "Draws"),
    ] {
        if let Some(v) = value {
            validate_counter(v, label)?;
        }
    }

    let mut active: player::ActiveModel = player_model.into();
    if let Some(position) = body.position {
        active.position = Set(Some(position));
    }
    if let Some(jersey_number) = body.jersey_number {
        active.jersey_number = Set(Some(jersey_number));
    }
    if let Some(date_joined) = body.date_joined {
        active.date_joined = Set(date_joined);
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(matches_played) = body.matches_played {
        active.matches_played = Set(matches_played);
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
    if let Some(personal_best) = body.personal_best {
        active.personal_best = Set(Some(personal_best));
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(load_response(&state.db, updated).await?))
}

/// `DELETE /api/v1/players/{id}`
///
/// Roster memberships, event selections, and performance rows for the player
/// go with it (the store cascades them).
async fn delete_player(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let player_model = find_player(&state.db, id).await?;

    player::Entity::delete_by_id(player_model.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Player"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/players/{id}/teams` — current roster membership ids.
async fn get_player_teams(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerTeamsResponse>, AppError> {
    find_player(&state.db, id).await?;
    let team_ids = reconcile::linked_ids::<PlayerTeams>(&state.db, id).await?;
    Ok(Json(PlayerTeamsResponse { team_ids }))
}

/// `PUT /api/v1/players/{id}/teams` — full replace of roster membership.
///
/// Unlike the create flow there is no compensation here: the player profile
/// predates this call, so a failed link write leaves the profile in place
/// with an empty team set, exactly as the engine's contract describes.
async fn set_player_teams(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetPlayerTeamsRequest>,
) -> Result<Json<PlayerTeamsResponse>, AppError> {
    find_player(&state.db, id).await?;

    reconcile::replace_links::<PlayerTeams>(&state.db, id, &body.team_ids).await?;

    let team_ids = reconcile::linked_ids::<PlayerTeams>(&state.db, id).await?;
    Ok(Json(PlayerTeamsResponse { team_ids }))
}
