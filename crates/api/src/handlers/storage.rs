//! Handlers for storage-mode management.
//!
//! Switching the mode is a non-migrating flag change: the in-memory
//! library is reloaded from the newly selected backend and nothing is
//! copied between backends.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use scenecast_store::StorageMode;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Storage status payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    /// Active mode name (`local` or `drive`).
    pub mode: &'static str,
    pub mode_label: &'static str,
    pub character_count: usize,
    pub scene_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SetMode {
    /// Mode name: `local` or `drive`.
    pub mode: String,
}

async fn status_of(state: &AppState) -> StorageStatus {
    let mode = state.library.mode().await;
    let (character_count, scene_count) = state
        .library
        .read(|data| (data.characters.len(), data.scenes.len()))
        .await;
    StorageStatus {
        mode: mode.name(),
        mode_label: mode.label(),
        character_count,
        scene_count,
    }
}

/// GET /api/v1/storage
pub async fn status(State(state): State<AppState>) -> AppResult<Json<DataResponse<StorageStatus>>> {
    Ok(Json(DataResponse {
        data: status_of(&state).await,
    }))
}

/// PUT /api/v1/storage/mode
///
/// The mode only changes once the new backend loads successfully; on
/// failure (e.g. drive without a sign-in) the previous mode stays
/// active. Data in the previous backend is left exactly as it was.
pub async fn set_mode(
    State(state): State<AppState>,
    Json(input): Json<SetMode>,
) -> AppResult<Json<DataResponse<StorageStatus>>> {
    let mode = StorageMode::from_name(&input.mode)?;
    state.library.switch_mode(&state.store, mode).await?;
    Ok(Json(DataResponse {
        data: status_of(&state).await,
    }))
}

/// POST /api/v1/storage/reload
///
/// Re-read the library from the active backend, dropping unsaved
/// in-memory changes.
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<DataResponse<StorageStatus>>> {
    state.library.reload(&state.store).await?;
    Ok(Json(DataResponse {
        data: status_of(&state).await,
    }))
}

/// POST /api/v1/storage/clear
///
/// Clears the active backend and resets the in-memory library. The
/// inactive backend is untouched.
pub async fn clear(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.library.clear(&state.store).await?;
    tracing::info!("Library cleared");
    Ok(StatusCode::NO_CONTENT)
}
