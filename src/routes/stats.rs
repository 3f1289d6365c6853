use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::entities::{event, player, team, user};
use crate::error::AppError;
use crate::services::stats::{self, Tally};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the statistics route group: `/stats/...` (any-auth reads).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/teams", get(team_rankings))
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverviewResponse {
    active_users: u64,
    active_teams: u64,
    active_players: u64,
    scheduled_events: u64,
    completed_events: u64,
    total_matches: i32,
    total_wins: i32,
    total_losses: i32,
    total_draws: i32,
    overall_win_rate: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankedTeam {
    rank: usize,
    id: Uuid,
    name: String,
    wins: i32,
    losses: i32,
    draws: i32,
    matches: i32,
    win_rate: i32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/stats/overview`
///
/// The overall win rate is computed from the summed team totals, never by
/// averaging per-team rates; the two disagree whenever teams have played
/// different numbers of matches.
async fn overview(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<OverviewResponse>, AppError> {
    let active_users = user::Entity::find()
        .filter(user::Column::IsActive.eq(true))
        .count(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let active_players = player::Entity::find()
        .filter(player::Column::IsActive.eq(true))
        .count(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let scheduled_events = event::Entity::find()
        .filter(event::Column::Status.eq("scheduled"))
        .count(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let completed_events = event::Entity::find()
        .filter(event::Column::Status.eq("completed"))
        .count(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let teams = team::Entity::find()
        .filter(team::Column::IsActive.eq(true))
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let active_teams = teams.len() as u64;
    let overall = stats::totals(teams.iter().map(|t| Tally::new(t.wins, t.losses, t.draws)));

    Ok(Json(OverviewResponse {
        active_users,
        active_teams,
        active_players,
        scheduled_events,
        completed_events,
        total_matches: overall.matches(),
        total_wins: overall.wins,
        total_losses: overall.losses,
        total_draws: overall.draws,
        overall_win_rate: overall.win_rate(),
    }))
}

/// `GET /api/v1/stats/teams` — teams ranked by win rate.
///
/// The underlying sort is stable with creation order as the input order, so
/// equal rates rank in the order the teams were created.
async fn team_rankings(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<RankedTeam>>, AppError> {
    let teams = team::Entity::find()
        .filter(team::Column::IsActive.eq(true))
        .order_by_asc(team::Column::CreatedAt)
        .all(&state.db)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let ranked = stats::rank_by_win_rate(teams, |t| Tally::new(t.wins, t.losses, t.draws));

    Ok(Json(
        ranked
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let tally = Tally::new(t.wins, t.losses, t.draws);
                RankedTeam {
                    rank: i + 1,
                    id: t.id,
                    name: t.name,
                    wins: t.wins,
                    losses: t.losses,
                    draws: t.draws,
                    matches: tally.matches(),
                    win_rate: tally.win_rate(),
                }
            })
            .collect(),
    ))
}
