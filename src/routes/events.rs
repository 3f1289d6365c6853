use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::{AuthUser, StaffUser};
use crate::entities::{event, event_team, performance, player, team};
use crate::error::AppError;
use crate::services::reconcile::{self, EventPlayers, EventTeams};
use crate::state::AppState;

/// Event kinds.
const EVENT_TYPES: &[&str] = &["tournament", "league", "friendly", "training"];

/// Event lifecycle states.
const STATUSES: &[&str] = &["scheduled", "ongoing", "completed", "cancelled"];

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the event route group: `/events/...` (staff writes, any-auth reads).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route(
            "/{id}",
            get(get_event).patch(update_event).delete(delete_event),
        )
        .route("/{id}/teams", get(get_event_teams).put(set_event_teams))
        .route(
            "/{id}/players",
            get(get_event_players).put(set_event_players),
        )
        .route(
            "/{id}/performances",
            get(get_performances).put(set_performances),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Status workflow
// ─────────────────────────────────────────────────────────────────────────────

/// Whether an event may move from `from` to `to`.
///
/// Forward-only: scheduled → ongoing → completed, with cancellation allowed
/// from either non-terminal state. `completed` and `cancelled` are terminal.
/// Re-asserting the current status is a no-op and always allowed.
fn status_transition_allowed(from: &str, to: &str) -> bool {
    if from == to {
        return true;
    }
    matches!(
        (from, to),
        ("scheduled", "ongoing")
            | ("scheduled", "cancelled")
            | ("ongoing", "completed")
            | ("ongoing", "cancelled")
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventResponse {
    id: Uuid,
    name: String,
    sport_id: Uuid,
    sport_name: Option<String>,
    event_date: NaiveDate,
    event_time: NaiveTime,
    location: String,
    event_type: String,
    status: String,
    result: Option<String>,
    team_ids: Vec<Uuid>,
    team_names: Vec<String>,
    created_at: String,
    updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateEventRequest {
    name: String,
    sport_id: Uuid,
    event_date: NaiveDate,
    event_time: NaiveTime,
    location: String,
    event_type: String,
    team_ids: Vec<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEventRequest {
    name: Option<String>,
    sport_id: Option<Uuid>,
    event_date: Option<NaiveDate>,
    event_time: Option<NaiveTime>,
    location: Option<String>,
    event_type: Option<String>,
    status: Option<String>,
    result: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetEventTeamsRequest {
    team_ids: Vec<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventTeamsResponse {
    team_ids: Vec<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetEventPlayersRequest {
    player_ids: Vec<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventPlayersResponse {
    player_ids: Vec<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceEntry {
    player_id: Option<Uuid>,
    team_id: Option<Uuid>,
    score: Option<f64>,
    position: Option<i32>,
    notes: Option<String>,
    #[serde(default)]
    metrics: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetPerformancesRequest {
    performances: Vec<PerformanceEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PerformanceResponse {
    id: Uuid,
    event_id: Uuid,
    player_id: Option<Uuid>,
    team_id: Option<Uuid>,
    score: Option<f64>,
    position: Option<i32>,
    notes: Option<String>,
    metrics: serde_json::Value,
    created_at: String,
    updated_at: String,
}

fn performance_response(p: performance::Model) -> PerformanceResponse {
    PerformanceResponse {
        id: p.id,
        event_id: p.event_id,
        player_id: p.player_id,
        team_id: p.team_id,
        score: p.score,
        position: p.position,
        notes: p.notes,
        metrics: p.metrics,
        created_at: p.created_at.to_rfc3339(),
        updated_at: p.updated_at.to_rfc3339(),
    }
}

fn validate_event_type(event_type: &str) -> Result<(), AppError> {
    if EVENT_TYPES.contains(&event_type) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Event type must be one of: {}.",
            EVENT_TYPES.join(", ")
        )))
    }
}

async fn find_event(db: &sea_orm::DatabaseConnection, id: Uuid) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Event not found.".to_string()))
}

/// Assemble the full response for one event: sport name plus assigned teams.
async fn load_response(
    state: &AppState,
    e: event::Model,
) -> Result<EventResponse, AppError> {
    let sport_name = state
        .sports
        .get(&state.db, e.sport_id)
        .await
        .map_err(|err| AppError::Internal(err.into()))?
        .map(|s| s.name);

    let team_ids = reconcile::linked_ids::<EventTeams>(&state.db, e.id).await?;
    let teams = team::Entity::find()
        .filter(team::Column::Id.is_in(team_ids.clone()))
        .all(&state.db)
        .await
        .map_err(|err| AppError::Internal(err.into()))?;
    let names: HashMap<Uuid, String> = teams.into_iter().map(|t| (t.id, t.name)).collect();
    let team_names = team_ids
        .iter()
        .filter_map(|id| names.get(id).cloned())
        .collect();

    Ok(EventResponse {
        id: e.id,
        name: e.name,
        sport_id: e.sport_id,
        sport_name,
        event_date: e.event_date,
        event_time: e.event_time,
        location: e.location,
        event_type: e.event_type,
        status: e.status,
        result: e.result,
        team_ids,
        team_names,
        created_at: e.created_at.to_rfc3339(),
        updated_at: e.updated_at.to_rfc3339(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers: CRUD
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/events` — most recent event date first.
async fn list_events(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = event::Entity::find()
        .order_by_desc(event::Column::EventDate)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let assignments = event_team::Entity::find()
        .filter(event_team::Column::EventId.is_in(events.iter().map(|e| e.id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let teams = team::Entity::find()
        .filter(team::Column::Id.is_in(assignments.iter().map(|a| a.team_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let team_names: HashMap<Uuid, String> = teams.into_iter().map(|t| (t.id, t.name)).collect();

    let mut by_event: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for a in assignments {
        by_event.entry(a.event_id).or_default().push(a.team_id);
    }

    let mut out = Vec::with_capacity(events.len());
    for e in events {
        let sport_name = state
            .sports
            .get(&state.db, e.sport_id)
            .await
            .map_err(|err| AppError::Internal(err.into()))?
            .map(|s| s.name);
        let team_ids = by_event.remove(&e.id).unwrap_or_default();
        let names = team_ids
            .iter()
            .filter_map(|id| team_names.get(id).cloned())
            .collect();
        out.push(EventResponse {
            id: e.id,
            name: e.name,
            sport_id: e.sport_id,
            sport_name,
            event_date: e.event_date,
            event_time: e.event_time,
            location: e.location,
            event_type: e.event_type,
            status: e.status,
            result: e.result,
            team_ids,
            team_names: names,
            created_at: e.created_at.to_rfc3339(),
            updated_at: e.updated_at.to_rfc3339(),
        });
    }

    Ok(Json(out))
}

/// `POST /api/v1/events`
///
/// An event must involve at least one team. As with player creation, the
/// event row is inserted first and the assignments written by the
/// full-replace engine; if the assignment write fails the just-created
/// event is deleted again before the error surfaces.
async fn create_event(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Json(body): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }
    validate_event_type(&body.event_type)?;
    if body.team_ids.is_empty() {
        return Err(AppError::BadRequest(
            "An event must involve at least one team.".to_string(),
        ));
    }

    state
        .sports
        .get(&state.db, body.sport_id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::BadRequest("Invalid sport selection.".to_string()))?;

    let now = Utc::now().fixed_offset();
    let new_event = event::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        sport_id: Set(body.sport_id),
        event_date: Set(body.event_date),
        event_time: Set(body.event_time),
        location: Set(body.location),
        event_type: Set(body.event_type),
        status: Set("scheduled".to_string()),
        result: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = new_event
        .insert(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Event"))?;

    if let Err(err) =
        reconcile::replace_links::<EventTeams>(&state.db, inserted.id, &body.team_ids).await
    {
        if let Err(cleanup) = event::Entity::delete_by_id(inserted.id).exec(&state.db).await {
            tracing::error!(event_id = %inserted.id, "Compensating delete failed: {cleanup}");
        }
        return Err(err);
    }

    let response = load_response(&state, inserted).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/v1/events/{id}`
async fn get_event(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventResponse>, AppError> {
    let event_model = find_event(&state.db, id).await?;
    Ok(Json(load_response(&state, event_model).await?))
}

/// `PATCH /api/v1/events/{id}`
///
/// Status changes are validated against the workflow before anything is
/// written; a request that also carries field edits is rejected whole when
/// its status change is illegal.
async fn update_event(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, AppError> {
    let event_model = find_event(&state.db, id).await?;

    if let Some(ref event_type) = body.event_type {
        validate_event_type(event_type)?;
    }
    if let Some(ref status) = body.status {
        if !STATUSES.contains(&status.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Status must be one of: {}.",
                STATUSES.join(", ")
            )));
        }
        if !status_transition_allowed(&event_model.status, status) {
            return Err(AppError::UnprocessableEntity(format!(
                "An event cannot move from '{}' to '{status}'.",
                event_model.status
            )));
        }
    }
    if let Some(sport_id) = body.sport_id {
        state
            .sports
            .get(&state.db, sport_id)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .ok_or_else(|| AppError::BadRequest("Invalid sport selection.".to_string()))?;
    }

    let mut active: event::ActiveModel = event_model.into();
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
    if let Some(event_date) = body.event_date {
        active.event_date = Set(event_date);
    }
    if let Some(event_time) = body.event_time {
        active.event_time = Set(event_time);
    }
    if let Some(location) = body.location {
        active.location = Set(location);
    }
    if let Some(event_type) = body.event_type {
        active.event_type = Set(event_type);
    }
    if let Some(status) = body.status {
        active.status = Set(status);
    }
    if let Some(result) = body.result {
        active.result = Set(Some(result));
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(load_response(&state, updated).await?))
}

/// `DELETE /api/v1/events/{id}`
///
/// Assignments, selections, and performance rows for the event go with it
/// (the store cascades them).
async fn delete_event(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let event_model = find_event(&state.db, id).await?;

    event::Entity::delete_by_id(event_model.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Event"))?;

    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers: team assignment and player selection
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/events/{id}/teams` — assigned team ids.
async fn get_event_teams(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventTeamsResponse>, AppError> {
    find_event(&state.db, id).await?;
    let team_ids = reconcile::linked_ids::<EventTeams>(&state.db, id).await?;
    Ok(Json(EventTeamsResponse { team_ids }))
}

/// `PUT /api/v1/events/{id}/teams` — full replace of team assignment.
async fn set_event_teams(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetEventTeamsRequest>,
) -> Result<Json<EventTeamsResponse>, AppError> {
    find_event(&state.db, id).await?;

    reconcile::replace_links::<EventTeams>(&state.db, id, &body.team_ids).await?;

    let team_ids = reconcile::linked_ids::<EventTeams>(&state.db, id).await?;
    Ok(Json(EventTeamsResponse { team_ids }))
}

/// `GET /api/v1/events/{id}/players` — selected player ids.
async fn get_event_players(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventPlayersResponse>, AppError> {
    find_event(&state.db, id).await?;
    let player_ids = reconcile::linked_ids::<EventPlayers>(&state.db, id).await?;
    Ok(Json(EventPlayersResponse { player_ids }))
}

/// `PUT /api/v1/events/{id}/players` — full replace of player selection.
///
/// Selection only makes sense once the event involves a team, so this is
/// rejected while the assignment set is empty.
async fn set_event_players(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetEventPlayersRequest>,
) -> Result<Json<EventPlayersResponse>, AppError> {
    find_event(&state.db, id).await?;

    let assigned = reconcile::linked_ids::<EventTeams>(&state.db, id).await?;
    if assigned.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Assign at least one team to the event before selecting players.".to_string(),
        ));
    }

    reconcile::replace_links::<EventPlayers>(&state.db, id, &body.player_ids).await?;

    let player_ids = reconcile::linked_ids::<EventPlayers>(&state.db, id).await?;
    Ok(Json(EventPlayersResponse { player_ids }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers: performances
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/events/{id}/performances`
async fn get_performances(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PerformanceResponse>>, AppError> {
    find_event(&state.db, id).await?;

    let rows = performance::Entity::find()
        .filter(performance::Column::EventId.eq(id))
        .order_by_asc(performance::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(rows.into_iter().map(performance_response).collect()))
}

/// `PUT /api/v1/events/{id}/performances` — full rebuild of the event's
/// performance rows.
///
/// Performances can only be recorded once the event is underway (ongoing or
/// completed). Each row must name exactly one subject, a player or a team.
/// The rebuild is the same delete-then-insert shape as the id reconciliation:
/// delete everything for the event, then insert the submitted rows; a failed
/// insert leaves the event with no performance rows and surfaces as a
/// partial write. Recording at least one performance row on an ongoing
/// event completes it; an empty rebuild only clears the rows and leaves
/// the status alone.
async fn set_performances(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetPerformancesRequest>,
) -> Result<Json<Vec<PerformanceResponse>>, AppError> {
    let event_model = find_event(&state.db, id).await?;

    if event_model.status != "ongoing" && event_model.status != "completed" {
        return Err(AppError::UnprocessableEntity(format!(
            "Performances can only be recorded for an ongoing or completed event; \
             this event is '{}'.",
            event_model.status
        )));
    }

    let mut player_ids = Vec::new();
    let mut team_ids = Vec::new();
    for entry in &body.performances {
        match (entry.player_id, entry.team_id) {
            (Some(pid), None) => player_ids.push(pid),
            (None, Some(tid)) => team_ids.push(tid),
            _ => {
                return Err(AppError::UnprocessableEntity(
                    "Each performance must name exactly one of playerId or teamId.".to_string(),
                ));
            }
        }
    }

    if !player_ids.is_empty() {
        let found = player::Entity::find()
            .filter(player::Column::Id.is_in(player_ids.clone()))
            .all(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        let known: std::collections::HashSet<Uuid> = found.into_iter().map(|p| p.id).collect();
        if player_ids.iter().any(|pid| !known.contains(pid)) {
            return Err(AppError::BadRequest(
                "One or more player ids do not exist.".to_string(),
            ));
        }
    }
    if !team_ids.is_empty() {
        let found = team::Entity::find()
            .filter(team::Column::Id.is_in(team_ids.clone()))
            .all(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        let known: std::collections::HashSet<Uuid> = found.into_iter().map(|t| t.id).collect();
        if team_ids.iter().any(|tid| !known.contains(tid)) {
            return Err(AppError::BadRequest(
                "One or more team ids do not exist.".to_string(),
            ));
        }
    }

    performance::Entity::delete_many()
        .filter(performance::Column::EventId.eq(id))
        .exec(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Performance"))?;

    if !body.performances.is_empty() {
        let now = Utc::now().fixed_offset();
        let rows = body.performances.iter().map(|entry| performance::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(id),
            player_id: Set(entry.player_id),
            team_id: Set(entry.team_id),
            score: Set(entry.score),
            position: Set(entry.position),
            notes: Set(entry.notes.clone()),
            metrics: Set(serde_json::Value::Object(entry.metrics.clone())),
            created_at: Set(now),
            updated_at: Set(now),
        });
        performance::Entity::insert_many(rows)
            .exec(&state.db)
            .await
            .map_err(|e| {
                tracing::error!(event_id = %id, "Performance insert failed after delete: {e}");
                AppError::PartialWrite(
                    "Existing performance rows were removed but the new rows could not be \
                     written; this event now has no performances. Resubmit to repair them."
                        .to_string(),
                )
            })?;
    }

    if event_model.status == "ongoing" && !body.performances.is_empty() {
        let mut active: event::ActiveModel = event_model.into();
        active.status = Set("completed".to_string());
        active.updated_at = Set(Utc::now().fixed_offset());
        active
            .update(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    }

    let rows = performance::Entity::find()
        .filter(performance::Column::EventId.eq(id))
        .order_by_asc(performance::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(rows.into_iter().map(performance_response).collect()))
}
