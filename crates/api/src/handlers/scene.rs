//! Handlers for the `/scenes` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use scenecast_core::data_uri;
use scenecast_core::scene::{CreateScene, Scene};
use scenecast_core::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/scenes
///
/// Newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Scene>>>> {
    let scenes = state.library.read(|data| data.scenes.clone()).await;
    Ok(Json(DataResponse { data: scenes }))
}

/// POST /api/v1/scenes
///
/// Saves a previously generated composite. `character_ids` are stored as
/// given; they are references, not foreign keys.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateScene>,
) -> AppResult<(StatusCode, Json<Scene>)> {
    data_uri::parse(&input.image_url)?;
    if input.prompt.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Scene prompt must not be empty".to_string(),
        )));
    }

    let new_scene = Scene::from_input(input);
    let created = state
        .library
        .mutate(&state.store, |data| {
            data.insert_scene(new_scene.clone())?;
            Ok(new_scene)
        })
        .await?;

    tracing::info!(id = %created.id, "Scene saved");
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/v1/scenes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<StatusCode> {
    let deleted = state
        .library
        .mutate(&state.store, |data| Ok(data.remove_scene(id)))
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Scene", id }))
    }
}
