//! Handlers for the `/characters` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use scenecast_core::character::{self, Character, CreateCharacter};
use scenecast_core::data_uri;
use scenecast_core::CoreError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/characters
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    let characters = state.library.read(|data| data.characters.clone()).await;
    Ok(Json(DataResponse { data: characters }))
}

/// POST /api/v1/characters
///
/// Accepts an uploaded or previously generated portrait as a `data:` URI.
/// The portrait must satisfy the upload rules (PNG/JPEG, 5 MB cap).
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    character::validate_create(&input)?;

    let portrait = data_uri::parse(&input.image_url)?;
    data_uri::probe_reference_image(&portrait)?;

    let new_character = Character::from_input(input);
    let created = state
        .library
        .mutate(&state.store, |data| {
            data.insert_character(new_character.clone())?;
            Ok(new_character)
        })
        .await?;

    tracing::info!(id = %created.id, name = %created.name, "Character created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Character>> {
    let character = state
        .library
        .read(|data| data.character(id).cloned())
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
///
/// Scenes referencing the character keep their reference (no cascade).
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = state
        .library
        .mutate(&state.store, |data| Ok(data.remove_character(id)))
        .await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))
    }
}
