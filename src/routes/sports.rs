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
use crate::entities::{sport, team};
use crate::error::AppError;
use crate::state::AppState;

/// Sport categories.
const CATEGORIES: &[&str] = &["team", "individual"];

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the sport route group: `/sports/...` (staff writes, any-auth reads).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sports).post(create_sport))
        .route(
            "/{id}",
            get(get_sport).patch(update_sport).delete(delete_sport),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SportResponse {
    id: Uuid,
    name: String,
    category: String,
    icon: String,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSportRequest {
    name: String,
    category: String,
    icon: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSportRequest {
    name: Option<String>,
    category: Option<String>,
    icon: Option<String>,
    is_active: Option<bool>,
}

fn to_response(s: sport::Model) -> SportResponse {
    SportResponse {
        id: s.id,
        name: s.name,
        category: s.category,
        icon: s.icon,
        is_active: s.is_active,
        created_at: s.created_at.to_rfc3339(),
        updated_at: s.updated_at.to_rfc3339(),
    }
}

fn validate_category(category: &str) -> Result<(), AppError> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "Category must be either 'team' or 'individual'.".to_string(),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/sports` — alphabetical.
async fn list_sports(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<SportResponse>>, AppError> {
    let sports = sport::Entity::find()
        .order_by_asc(sport::Column::Name)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    // Keep the lookup cache fresh while we have the rows in hand
    for s in &sports {
        state.sports.put(s.clone());
    }

    Ok(Json(sports.into_iter().map(to_response).collect()))
}

/// `POST /api/v1/sports`
async fn create_sport(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Json(body): Json<CreateSportRequest>,
) -> Result<(StatusCode, Json<SportResponse>), AppError> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }
    validate_category(&body.category)?;

    // Friendly duplicate check; the unique constraint backs it up on a race
    let existing = sport::Entity::find()
        .filter(sport::Column::Name.eq(&name))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A sport with this name already exists.".to_string(),
        ));
    }

    let now = Utc::now().fixed_offset();
    let new_sport = sport::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        category: Set(body.category),
        icon: Set(body.icon.unwrap_or_else(|| "trophy".to_string())),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = new_sport
        .insert(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "A sport with this name"))?;

    state.sports.put(inserted.clone());
    Ok((StatusCode::CREATED, Json(to_response(inserted))))
}

/// `GET /api/v1/sports/{id}`
async fn get_sport(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SportResponse>, AppError> {
    let sport_model = state
        .sports
        .get(&state.db, id)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Sport not found.".to_string()))?;

    Ok(Json(to_response(sport_model)))
}

/// `PATCH /api/v1/sports/{id}`
async fn update_sport(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateSportRequest>,
) -> Result<Json<SportResponse>, AppError> {
    let sport_model = sport::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Sport not found.".to_string()))?;

    if let Some(ref name) = body.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Name cannot be empty.".to_string()));
        }
        let clash = sport::Entity::find()
            .filter(sport::Column::Name.eq(name))
            .filter(sport::Column::Id.ne(id))
            .one(&state.db)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        if clash.is_some() {
            return Err(AppError::Conflict(
                "A sport with this name already exists.".to_string(),
            ));
        }
    }
    if let Some(ref category) = body.category {
        validate_category(category)?;
    }

    let mut active: sport::ActiveModel = sport_model.into();
    if let Some(name) = body.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(category) = body.category {
        active.category = Set(category);
    }
    if let Some(icon) = body.icon {
        active.icon = Set(icon);
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "A sport with this name"))?;

    state.sports.put(updated.clone());
    Ok(Json(to_response(updated)))
}

/// `DELETE /api/v1/sports/{id}`
///
/// Refused while teams still reference the sport; the store's RESTRICT
/// backs up this check.
async fn delete_sport(
    State(state): State<AppState>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let sport_model = sport::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Sport not found.".to_string()))?;

    let dependent_teams = team::Entity::find()
        .filter(team::Column::SportId.eq(id))
        .count(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if dependent_teams > 0 {
        return Err(AppError::Conflict(format!(
            "Sport '{}' is still in use by {dependent_teams} team(s). \
             Delete or reassign those teams first.",
            sport_model.name
        )));
    }

    sport::Entity::delete_by_id(id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Sport"))?;

    state.sports.remove(id);
    Ok(StatusCode::NO_CONTENT)
}
