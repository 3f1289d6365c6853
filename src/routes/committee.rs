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

use crate::auth::middleware::AdminUser;
use crate::entities::{committee_member, user};
use crate::error::AppError;
use crate::state::AppState;

/// Committee positions.
const POSITIONS: &[&str] = &[
    "president",
    "secretary",
    "treasurer",
    "executive",
    "sports_officer",
];

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the committee route group: `/committee/...` (admin only).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route(
            "/{id}",
            get(get_member).patch(update_member).delete(delete_member),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MemberResponse {
    id: Uuid,
    user_id: Uuid,
    name: Option<String>,
    email: Option<String>,
    position: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMemberRequest {
    user_id: Uuid,
    position: String,
    start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMemberRequest {
    position: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    is_active: Option<bool>,
}

fn to_response(m: committee_member::Model, account: Option<&user::Model>) -> MemberResponse {
    MemberResponse {
        id: m.id,
        user_id: m.user_id,
        name: account.map(|u| u.name.clone()),
        email: account.map(|u| u.email.clone()),
        position: m.position,
        start_date: m.start_date,
        end_date: m.end_date,
        is_active: m.is_active,
        created_at: m.created_at.to_rfc3339(),
        updated_at: m.updated_at.to_rfc3339(),
    }
}

fn validate_position(position: &str) -> Result<(), AppError> {
    if POSITIONS.contains(&position) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Position must be one of: {}.",
            POSITIONS.join(", ")
        )))
    }
}

async fn find_member(
    db: &sea_orm::DatabaseConnection,
    id: Uuid,
) -> Result<committee_member::Model, AppError> {
    committee_member::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::NotFound("Committee member not found.".to_string()))
}

async fn with_account(
    db: &sea_orm::DatabaseConnection,
    m: committee_member::Model,
) -> Result<MemberResponse, AppError> {
    let account = user::Entity::find_by_id(m.user_id)
        .one(db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(to_response(m, account.as_ref()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/committee` — newest first, with account names embedded.
async fn list_members(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let members = committee_member::Entity::find()
        .order_by_desc(committee_member::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let accounts = user::Entity::find()
        .filter(user::Column::Id.is_in(members.iter().map(|m| m.user_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let accounts: HashMap<Uuid, user::Model> = accounts.into_iter().map(|u| (u.id, u)).collect();

    Ok(Json(
        members
            .into_iter()
            .map(|m| {
                let account = accounts.get(&m.user_id);
                to_response(m, account)
            })
            .collect(),
    ))
}

/// `POST /api/v1/committee`
async fn create_member(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(body): Json<CreateMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    validate_position(&body.position)?;

    user::Entity::find_by_id(body.user_id)
        .one(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .ok_or_else(|| AppError::BadRequest("Invalid user selection.".to_string()))?;

    let now = Utc::now().fixed_offset();
    let new_member = committee_member::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(body.user_id),
        position: Set(body.position),
        start_date: Set(body.start_date.unwrap_or_else(|| Utc::now().date_naive())),
        end_date: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let inserted = new_member
        .insert(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Committee member"))?;

    Ok((
        StatusCode::CREATED,
        Json(with_account(&state.db, inserted).await?),
    ))
}

/// `GET /api/v1/committee/{id}`
async fn get_member(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberResponse>, AppError> {
    let member = find_member(&state.db, id).await?;
    Ok(Json(with_account(&state.db, member).await?))
}

/// `PATCH /api/v1/committee/{id}` — position change, end of tenure, or
/// deactivation.
async fn update_member(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    let member = find_member(&state.db, id).await?;

    if let Some(ref position) = body.position {
        validate_position(position)?;
    }

    let mut active: committee_member::ActiveModel = member.into();
    if let Some(position) = body.position {
        active.position = Set(position);
    }
    if let Some(start_date) = body.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = body.end_date {
        active.end_date = Set(Some(end_date));
    }
    if let Some(is_active) = body.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().fixed_offset());

    let updated = active
        .update(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(with_account(&state.db, updated).await?))
}

/// `DELETE /api/v1/committee/{id}`
async fn delete_member(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let member = find_member(&state.db, id).await?;

    committee_member::Entity::delete_by_id(member.id)
        .exec(&state.db)
        .await
        .map_err(|e| AppError::from_db(e, "Committee member"))?;

    Ok(StatusCode::NO_CONTENT)
}
