//! Handlers for AI generation: portraits and scene composites.
//!
//! Routes:
//! - `POST /characters/portrait` -> generate a portrait from form fields
//! - `POST /scenes/generate`     -> composite selected characters into a scene
//!
//! Neither endpoint saves anything: the client previews the returned
//! image and saves it through the library endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use scenecast_core::character::{self, PortraitRequest};
use scenecast_core::data_uri::{self, InlineImage};
use scenecast_core::scene::{self, GenerateScene};

use crate::error::AppResult;
use crate::state::AppState;

/// A freshly generated image, as a `data:` URI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub image_url: String,
    /// Portrait generations left in this session (portraits only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

/// POST /api/v1/characters/portrait
///
/// Validates the form, consumes one unit of the session quota, then
/// generates. The quota is checked before the upstream call so an
/// exhausted session never spends API credit.
pub async fn portrait(
    State(state): State<AppState>,
    Json(input): Json<PortraitRequest>,
) -> AppResult<Json<GeneratedImage>> {
    character::validate_portrait_request(&input)?;
    let remaining = state.quota.try_acquire()?;

    let prompt = character::portrait_prompt(&input);
    let image_url = state.genai.generate(&prompt, &[]).await?;

    tracing::info!(remaining, "Portrait generated");
    Ok(Json(GeneratedImage {
        image_url,
        remaining: Some(remaining),
    }))
}

/// POST /api/v1/scenes/generate
///
/// Resolves the selected characters' portraits into reference images and
/// submits them together with the composed scene prompt.
pub async fn generate_scene(
    State(state): State<AppState>,
    Json(input): Json<GenerateScene>,
) -> AppResult<Json<GeneratedImage>> {
    scene::validate_generate(&input)?;

    // Resolve portraits under the library lock, then release it for the
    // duration of the upstream call.
    let references: Vec<InlineImage> = state
        .library
        .read(|data| {
            data.resolve_characters(&input.character_ids)
                .and_then(|chars| {
                    chars
                        .iter()
                        .map(|c| data_uri::parse(&c.image_url))
                        .collect()
                })
        })
        .await?;

    let prompt = scene::scene_prompt(&input.prompt, &input.aspect_ratio, references.len());
    let image_url = state.genai.generate(&prompt, &references).await?;

    tracing::info!(
        characters = references.len(),
        aspect_ratio = %input.aspect_ratio,
        "Scene composite generated"
    );
    Ok(Json(GeneratedImage {
        image_url,
        remaining: None,
    }))
}
