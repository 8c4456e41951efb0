//! Route definitions for storage-mode management.
//!
//! ```text
//! GET  /         -> status (mode + counts)
//! PUT  /mode     -> switch the active backend (non-migrating)
//! POST /reload   -> re-read from the active backend
//! POST /clear    -> clear the active backend
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::storage;
use crate::state::AppState;

/// Routes mounted at `/storage`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(storage::status))
        .route("/mode", put(storage::set_mode))
        .route("/reload", post(storage::reload))
        .route("/clear", post(storage::clear))
}
