use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::auth::password;
use crate::entities::{team, user};
use crate::error::AppError;
use crate::services::reconcile;
use crate::state::AppState;

/// Roles a club member account can hold.
const ROLES: &[&str] = &["admin", "committee", "coach", "player"];

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the user management route group: `/users/...` (admin only).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/{id}/teams", get(get_coach_teams).put(set_coach_teams))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    avatar_url: Option<String>,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest {
    email: String,
    name: String,
    role: String,
    avatar_url: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserRequest {
    name: Option<String>,
    role: Option<String>,
    avatar_url: Option<String>,
    is_active: Option<bool>,
    password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetCoachTeamsRequest {
    team_ids: Vec<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CoachTeamsResponse {
    team_ids: Vec<Uuid>,
}

fn to_response(u: user::Model) -> UserResponse {
    UserResponse {
        id: u.id,
        email: u.email,
        name: u.name,
        role: u.role,
        avatar_url: u.avatar_url,
        is_active: u.is_active,
        created_at: u.created_at.to_rfc3339(),
        updated_at: u.updated_at.to_rfc3339(),
    }
}

fn validate_role(role: &str) -> Result<(), AppError> {
    if ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Role must be one of: {}.",
            ROLES.join(", ")
        )))
    }
}

async fn find_user(db: &sea_orm::DatabaseConnection, id: Uuid) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/users` — newest first.
async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user::Entity::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(users.into_iter().map(to_response).collect()))
}

/// `POST /api/v1/users`
async fn create_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required.".to_string()));
    }

    let email = body.email.trim().to_lowercase();
    password::validate_email(&email).map_err(AppError::BadRequest)?;
    validate_role(&body.role)?;

    let password_hash = match body.password.as_deref() {
        Some(pw) => {
            password::validate_password(pw).map_err(AppError::BadRequest)?;
            Some(password::hash_password(pw)?)
        }
        None => None,
    };

    // Friendly duplicate check before insert; the unique constraint still
    // backs this up if a concurrent create slips past it.
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A user with this email already exists.".to_string(),
        ));
    }

    let now = Utc::now().fixed_offset();
    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        name: Set(name),
        role: Set(body.role),
        avatar_url: Set(body.avatar_url),
        password_hash: Set(password_hash),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = new_user
        .insert(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "A user with this email"))?;

    Ok((StatusCode::CREATED, Json(to_response(inserted))))
}

/// `GET /api/v1/users/{id}`
async fn get_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user_model = find_user(&state.db, id).await?;
    Ok(Json(to_response(user_model)))
}

/// `PATCH /api/v1/users/{id}`
///
/// Demoting a coach away from the `coach` role unassigns every team they
/// coach before the role change lands, so no team points at a non-coach.
/// Every field is validated before that cleanup runs; a rejected request
/// must not mutate anything.
async fn update_user(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user_model = find_user(&state.db, id).await?;

    if let Some(ref role) = body.role {
        validate_role(role)?;
    }
    let name = match body.name {
        Some(ref name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::BadRequest("Name cannot be empty.".to_string()));
            }
            Some(name)
        }
        None => None,
    };
    let password_hash = match body.password.as_deref() {
        Some(pw) => {
            password::validate_password(pw).map_err(AppError::BadRequest)?;
            Some(password::hash_password(pw)?)
        }
        None => None,
    };

    if let Some(ref role) = body.role {
        if user_model.role == "coach" && role != "coach" {
            reconcile::clear_coach_teams(&state.db, user_model.id).await?;
        }
    }

    let mut active: user::ActiveModel = user_model.into();

    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(role) = body.role {
        active.role = Set(role);
    }
    if let Some(avatar_url) = body.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(hash) = password_hash {
        active.password_hash = Set(Some(hash));
    }

    active.updated_at = Set(Utc::now().fixed_offset());
    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(to_response(updated)))
}

/// `DELETE /api/v1/users/{id}`
///
/// Deleting a coach unassigns their teams first; the store's SET NULL backs
/// this up, but the explicit clear keeps the behavior visible and portable.
async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if admin.id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account.".to_string(),
        ));
    }

    let user_model = find_user(&state.db, id).await?;

    if user_model.role == "coach" {
        reconcile::clear_coach_teams(&state.db, user_model.id).await?;
    }

    user::Entity::delete_by_id(user_model.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "User"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/v1/users/{id}/teams` — ids of teams this coach holds.
async fn get_coach_teams(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CoachTeamsResponse>, AppError> {
    find_user(&state.db, id).await?;

    let teams = team::Entity::find()
        .filter(team::Column::CoachId.eq(id))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(CoachTeamsResponse {
        team_ids: teams.into_iter().map(|t| t.id).collect(),
    }))
}

/// `PUT /api/v1/users/{id}/teams` — make this coach hold exactly the listed teams.
async fn set_coach_teams(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SetCoachTeamsRequest>,
) -> Result<Json<CoachTeamsResponse>, AppError> {
    let user_model = find_user(&state.db, id).await?;
    if user_model.role != "coach" {
        return Err(AppError::UnprocessableEntity(
            "Teams can only be assigned to a user with the coach role.".to_string(),
        ));
    }

    reconcile::assign_coach_teams(&state.db, user_model.id, &body.team_ids).await?;

    let teams = team::Entity::find()
        .filter(team::Column::CoachId.eq(id))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(CoachTeamsResponse {
        team_ids: teams.into_iter().map(|t| t.id).collect(),
    }))
}
