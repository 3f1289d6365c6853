mod auth;
mod coach;
mod committee;
mod events;
mod health;
mod players;
mod sports;
mod stats;
mod teams;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` — lightweight health check (used by Railway)
/// - `GET /api/v1/health` — detailed health check with database connectivity
/// - `/api/v1/auth` — sign-in and current-user lookup
/// - `/api/v1/{users,sports,teams,players,events,committee}` — entity CRUD
/// - `/api/v1/coach` — self-scoped reads for the signed-in coach
/// - `/api/v1/stats` — derived statistics
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/sports", sports::router())
        .nest("/teams", teams::router())
        .nest("/players", players::router())
        .nest("/events", events::router())
        .nest("/committee", committee::router())
        .nest("/coach", coach::router())
        .nest("/stats", stats::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
