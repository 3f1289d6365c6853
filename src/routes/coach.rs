use std::collections::{HashMap, HashSet};

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::{event, event_team, player, player_team, team, user};
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the coach self-service route group: `/coach/...`
///
/// Everything here is scoped to the signed-in coach; there are no path ids
/// to leak another coach's data through.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(my_teams))
        .route("/players", get(my_players))
        .route("/events", get(my_events))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CoachTeamResponse {
    id: Uuid,
    name: String,
    sport_id: Uuid,
    sport_name: Option<String>,
    gender: String,
    is_active: bool,
    wins: i32,
    losses: i32,
    draws: i32,
    active_player_count: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CoachPlayerResponse {
    id: Uuid,
    user_id: Uuid,
    name: Option<String>,
    email: Option<String>,
    position: Option<String>,
    jersey_number: Option<i32>,
    team_ids: Vec<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CoachEventResponse {
    id: Uuid,
    name: String,
    sport_id: Uuid,
    event_date: NaiveDate,
    event_time: NaiveTime,
    location: String,
    event_type: String,
    status: String,
    team_ids: Vec<Uuid>,
}

fn require_coach(user_model: &user::Model) -> Result<(), AppError> {
    if user_model.role == "coach" {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Coach access required.".to_string(),
        ))
    }
}

/// Teams currently assigned to this coach.
async fn teams_of(
    db: &sea_orm::DatabaseConnection,
    coach_id: Uuid,
) -> Result<Vec<team::Model>, AppError> {
    team::Entity::find()
        .filter(team::Column::CoachId.eq(coach_id))
        .order_by_asc(team::Column::Name)
        .all(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/coach/teams` — my teams, with active roster sizes.
///
/// The roster count requires both sides active: the membership row and the
/// player profile behind it.
async fn my_teams(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<CoachTeamResponse>>, AppError> {
    require_coach(&me)?;

    let teams = teams_of(&state.db, me.id).await?;

    let memberships = player_team::Entity::find()
        .filter(player_team::Column::TeamId.is_in(teams.iter().map(|t| t.id).collect::<Vec<_>>()))
        .filter(player_team::Column::IsActive.eq(true))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let active_players: HashSet<Uuid> = player::Entity::find()
        .filter(
            player::Column::Id.is_in(memberships.iter().map(|m| m.player_id).collect::<Vec<_>>()),
        )
        .filter(player::Column::IsActive.eq(true))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .into_iter()
        .map(|p| p.id)
        .collect();

    let mut counts: HashMap<Uuid, u64> = HashMap::new();
    for m in &memberships {
        if active_players.contains(&m.player_id) {
            *counts.entry(m.team_id).or_default() += 1;
        }
    }

    let mut out = Vec::with_capacity(teams.len());
    for t in teams {
        let sport_name = state
            .sports
            .get(&state.db, t.sport_id)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .map(|s| s.name);
        out.push(CoachTeamResponse {
            id: t.id,
            name: t.name,
            sport_id: t.sport_id,
            sport_name,
            gender: t.gender,
            is_active: t.is_active,
            wins: t.wins,
            losses: t.losses,
            draws: t.draws,
            active_player_count: counts.get(&t.id).copied().unwrap_or(0),
        });
    }

    Ok(Json(out))
}

/// `GET /api/v1/coach/players` — every player rostered on one of my teams.
async fn my_players(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<CoachPlayerResponse>>, AppError> {
    require_coach(&me)?;

    let teams = teams_of(&state.db, me.id).await?;
    let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();

    let memberships = player_team::Entity::find()
        .filter(player_team::Column::TeamId.is_in(team_ids.clone()))
        .filter(player_team::Column::IsActive.eq(true))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut my_team_links: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for m in memberships {
        my_team_links.entry(m.player_id).or_default().push(m.team_id);
    }

    let players = player::Entity::find()
        .filter(player::Column::Id.is_in(my_team_links.keys().copied().collect::<Vec<_>>()))
        .filter(player::Column::IsActive.eq(true))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let accounts = user::Entity::find()
        .filter(user::Column::Id.is_in(players.iter().map(|p| p.user_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let accounts: HashMap<Uuid, user::Model> = accounts.into_iter().map(|u| (u.id, u)).collect();

    let out = players
        .into_iter()
        .map(|p| {
            let account = accounts.get(&p.user_id);
            CoachPlayerResponse {
                id: p.id,
                user_id: p.user_id,
                name: account.map(|u| u.name.clone()),
                email: account.map(|u| u.email.clone()),
                position: p.position,
                jersey_number: p.jersey_number,
                team_ids: my_team_links.get(&p.id).cloned().unwrap_or_default(),
            }
        })
        .collect();

    Ok(Json(out))
}

/// `GET /api/v1/coach/events` — events involving any of my teams.
async fn my_events(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<CoachEventResponse>>, AppError> {
    require_coach(&me)?;

    let teams = teams_of(&state.db, me.id).await?;
    let team_ids: Vec<Uuid> = teams.iter().map(|t| t.id).collect();

    let assignments = event_team::Entity::find()
        .filter(event_team::Column::TeamId.is_in(team_ids.clone()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let event_ids: HashSet<Uuid> = assignments.iter().map(|a| a.event_id).collect();
    if event_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    // Full team set per event, not just my teams, so the coach sees who
    // else is playing.
    let all_assignments = event_team::Entity::find()
        .filter(event_team::Column::EventId.is_in(event_ids.iter().copied().collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let mut by_event: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for a in all_assignments {
        by_event.entry(a.event_id).or_default().push(a.team_id);
    }

    let events = event::Entity::find()
        .filter(event::Column::Id.is_in(event_ids.into_iter().collect::<Vec<_>>()))
        .order_by_desc(event::Column::EventDate)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let out = events
        .into_iter()
        .map(|e| CoachEventResponse {
            team_ids: by_event.remove(&e.id).unwrap_or_default(),
            id: e.id,
            name: e.name,
            sport_id: e.sport_id,
            event_date: e.event_date,
            event_time: e.event_time,
            location: e.location,
            event_type: e.event_type,
            status: e.status,
        })
        .collect();

    Ok(Json(out))
}
