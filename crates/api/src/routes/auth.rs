//! Route definitions for the drive auth gate.
//!
//! ```text
//! POST /sign-in   -> obtain and cache an access token
//! POST /sign-out  -> revoke and drop the cached token
//! GET  /status    -> whether a token is cached
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/status", get(auth::status))
}
