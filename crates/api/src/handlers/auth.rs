//! Handlers for the drive auth gate.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub signed_in: bool,
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(State(state): State<AppState>) -> AppResult<Json<DataResponse<AuthStatus>>> {
    state.auth.sign_in().await?;
    Ok(Json(DataResponse {
        data: AuthStatus { signed_in: true },
    }))
}

/// POST /api/v1/auth/sign-out
///
/// Best-effort revoke; always succeeds from the client's point of view.
pub async fn sign_out(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.auth.sign_out().await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/status
pub async fn status(State(state): State<AppState>) -> AppResult<Json<DataResponse<AuthStatus>>> {
    Ok(Json(DataResponse {
        data: AuthStatus {
            signed_in: state.auth.is_signed_in().await,
        },
    }))
}
