//! Route definitions for the character library.
//!
//! ```text
//! GET    /           -> list
//! POST   /           -> create
//! GET    /{id}       -> get_by_id
//! DELETE /{id}       -> delete
//! POST   /portrait   -> generate a portrait (session-quota limited)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{character, generation};
use crate::state::AppState;

/// Routes mounted at `/characters`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list).post(character::create))
        .route("/portrait", post(generation::portrait))
        .route("/{id}", get(character::get_by_id).delete(character::delete))
}
