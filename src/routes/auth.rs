use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::auth::{jwt, password};
use crate::entities::user;
use crate::error::AppError;
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the auth route group: `/auth/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(signin))
        .route("/me", get(me))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SigninRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionUser {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    avatar_url: Option<String>,
    is_active: bool,
    created_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SigninResponse {
    user: SessionUser,
    token: String,
}

fn session_user(user_model: &user::Model) -> SessionUser {
    SessionUser {
        id: user_model.id,
        email: user_model.email.clone(),
        name: user_model.name.clone(),
        role: user_model.role.clone(),
        avatar_url: user_model.avatar_url.clone(),
        is_active: user_model.is_active,
        created_at: user_model.created_at.to_rfc3339(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/auth/signin`
async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, AppError> {
    let email = body.email.trim().to_lowercase();

    let user_model = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    if !user_model.is_active {
        return Err(AppError::Forbidden("Account is deactivated.".to_string()));
    }

    // Roster-only accounts have no password until an admin sets one
    let hash = user_model
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password.".to_string()))?;

    let valid = password::verify_password(&body.password, hash)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    let token = jwt::generate_access_token(user_model.id, &user_model.role, &state.config)?;

    Ok(Json(SigninResponse {
        user: session_user(&user_model),
        token,
    }))
}

/// `GET /api/v1/auth/me`
async fn me(AuthUser(user_model): AuthUser) -> Json<SessionUser> {
    Json(session_user(&user_model))
}
