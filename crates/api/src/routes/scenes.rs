//! Route definitions for saved scenes and scene generation.
//!
//! ```text
//! GET    /           -> list (newest first)
//! POST   /           -> create (save a generated composite)
//! DELETE /{id}       -> delete
//! POST   /generate   -> generate a composite from selected characters
//! ```

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{generation, scene};
use crate::state::AppState;

/// Routes mounted at `/scenes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scene::list).post(scene::create))
        .route("/generate", post(generation::generate_scene))
        .route("/{id}", delete(scene::delete))
}
