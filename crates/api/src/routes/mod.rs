//! Route definitions, one module per resource.

pub mod auth;
pub mod characters;
pub mod health;
pub mod scenes;
pub mod storage;

use axum::Router;

use crate::state::AppState;

/// All `/api/v1` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", characters::router())
        .nest("/scenes", scenes::router())
        .nest("/storage", storage::router())
        .nest("/auth", auth::router())
}
