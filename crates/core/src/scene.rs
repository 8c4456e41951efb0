//! Scene entity, aspect-ratio catalog, and scene prompt composition.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Aspect ratios
// ---------------------------------------------------------------------------

/// A labelled aspect ratio choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct AspectRatio {
    pub label: &'static str,
    /// `W:H` value passed through to the generation prompt.
    pub value: &'static str,
}

/// The fixed catalog offered to clients. Platform entries alias the base
/// ratios; the first entry is the default.
pub const ASPECT_RATIOS: &[AspectRatio] = &[
    AspectRatio { label: "Portrait (9:16)", value: "9:16" },
    AspectRatio { label: "Landscape (16:9)", value: "16:9" },
    AspectRatio { label: "Square (1:1)", value: "1:1" },
    AspectRatio { label: "Classic (4:3)", value: "4:3" },
    AspectRatio { label: "YouTube (16:9)", value: "16:9" },
    AspectRatio { label: "TikTok (9:16)", value: "9:16" },
    AspectRatio { label: "Facebook (1:1)", value: "1:1" },
];

/// The default aspect ratio (first catalog entry).
pub fn default_aspect_ratio() -> &'static AspectRatio {
    &ASPECT_RATIOS[0]
}

/// Validate that `value` is one of the catalog's `W:H` values.
pub fn validate_aspect_ratio(value: &str) -> Result<(), CoreError> {
    if ASPECT_RATIOS.iter().any(|r| r.value == value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown aspect ratio '{value}'. Must be one of: 9:16, 16:9, 1:1, 4:3"
        )))
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A generated composite image referencing zero or more characters.
///
/// `character_ids` is a plain reference list: deleting a character does
/// NOT rewrite or remove scenes that reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Scene {
    pub id: Uuid,
    /// Composite image as a `data:` URI.
    pub image_url: String,
    /// The user's scene description (not the fully composed prompt).
    pub prompt: String,
    pub character_ids: Vec<Uuid>,
}

/// Input payload for saving a generated scene.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateScene {
    pub image_url: String,
    pub prompt: String,
    #[serde(default)]
    pub character_ids: Vec<Uuid>,
}

/// Input payload for generating a scene composite.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GenerateScene {
    /// Free-text description of the setting.
    pub prompt: String,
    /// `W:H` value from the aspect-ratio catalog.
    pub aspect_ratio: String,
    /// Characters to composite into the scene, by id.
    pub character_ids: Vec<Uuid>,
}

impl Scene {
    /// Build a scene from a create payload, assigning a fresh id.
    pub fn from_input(input: CreateScene) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_url: input.image_url,
            prompt: input.prompt,
            character_ids: input.character_ids,
        }
    }
}

// ---------------------------------------------------------------------------
// Scene prompt composition
// ---------------------------------------------------------------------------

/// Compose the full generation prompt for a scene composite.
///
/// `reference_count` controls singular/plural phrasing for the characters
/// supplied as reference images alongside this prompt.
pub fn scene_prompt(description: &str, aspect_ratio: &str, reference_count: usize) -> String {
    let subject = if reference_count > 1 {
        "the provided characters are"
    } else {
        "the provided character is"
    };
    format!(
        "Create an artistic image with a {aspect_ratio} aspect ratio. In it, {subject} in a \
         setting described as: \"{description}\". Keep the appearance of the character(s) from \
         the original image(s) exactly as-is and blend them seamlessly into the new setting, \
         paying attention to natural lighting, shadows and perspective."
    )
}

/// Validate a scene generation request: non-empty description, known
/// aspect ratio, at least one character selected.
pub fn validate_generate(input: &GenerateScene) -> Result<(), CoreError> {
    if input.prompt.trim().is_empty() {
        return Err(CoreError::Validation(
            "Scene description must not be empty".to_string(),
        ));
    }
    validate_aspect_ratio(&input.aspect_ratio)?;
    if input.character_ids.is_empty() {
        return Err(CoreError::Validation(
            "At least one character must be selected for a scene".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_values_all_validate() {
        for ratio in ASPECT_RATIOS {
            assert!(validate_aspect_ratio(ratio.value).is_ok());
        }
    }

    #[test]
    fn unknown_ratio_is_rejected() {
        assert!(validate_aspect_ratio("3:2").is_err());
        assert!(validate_aspect_ratio("").is_err());
    }

    #[test]
    fn default_ratio_is_portrait() {
        assert_eq!(default_aspect_ratio().value, "9:16");
    }

    #[test]
    fn scene_prompt_singular() {
        let prompt = scene_prompt("a rainy street", "16:9", 1);
        assert!(prompt.contains("the provided character is"));
        assert!(prompt.contains("16:9 aspect ratio"));
        assert!(prompt.contains("\"a rainy street\""));
    }

    #[test]
    fn scene_prompt_plural() {
        let prompt = scene_prompt("a castle hall", "1:1", 3);
        assert!(prompt.contains("the provided characters are"));
    }

    #[test]
    fn validate_generate_rejects_blank_prompt() {
        let input = GenerateScene {
            prompt: "  ".to_string(),
            aspect_ratio: "9:16".to_string(),
            character_ids: vec![Uuid::new_v4()],
        };
        assert!(validate_generate(&input).is_err());
    }

    #[test]
    fn validate_generate_rejects_no_characters() {
        let input = GenerateScene {
            prompt: "a beach at sunset".to_string(),
            aspect_ratio: "9:16".to_string(),
            character_ids: vec![],
        };
        assert!(validate_generate(&input).is_err());
    }

    #[test]
    fn validate_generate_accepts_valid_input() {
        let input = GenerateScene {
            prompt: "a beach at sunset".to_string(),
            aspect_ratio: "16:9".to_string(),
            character_ids: vec![Uuid::new_v4()],
        };
        assert!(validate_generate(&input).is_ok());
    }
}
