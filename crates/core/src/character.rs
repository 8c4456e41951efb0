//! Character entity and portrait prompt composition.
//!
//! A character is a saved portrait (a `data:` URI) plus free-text
//! descriptive attributes. Identity is immutable once created; the only
//! mutations the library supports are insert and delete.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use crate::data_uri;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Portrait style presets offered by clients. Free text is also accepted;
/// this list only drives UI defaults.
pub const STYLE_PRESETS: &[&str] = &["Realistic", "Anime", "Cartoon", "Fantasy"];

/// Closing instruction appended to every portrait prompt so generated
/// portraits composite cleanly into scenes later.
const PLAIN_BACKGROUND_SUFFIX: &str =
    "The character is shown on a plain white background so the subject is easy to isolate.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A saved portrait entity with descriptive attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Character {
    pub id: Uuid,
    pub name: String,
    /// Portrait image as a `data:` URI.
    pub image_url: String,
    pub style: String,
    pub gender: String,
    pub age: String,
    pub outfit: String,
    pub expression: String,
}

/// Input payload for creating a character.
#[derive(Debug, Clone, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCharacter {
    #[validate(length(min = 1, message = "Character name must not be empty"))]
    pub name: String,
    /// Portrait image as a `data:` URI (uploaded or previously generated).
    pub image_url: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub outfit: String,
    #[serde(default)]
    pub expression: String,
}

/// Form fields describing the portrait to generate.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PortraitRequest {
    pub style: String,
    pub gender: String,
    pub age: String,
    pub outfit: String,
    pub expression: String,
    /// Optional free-text details (hair, eyes, accessories, ...).
    #[serde(default)]
    pub details: String,
}

// ---------------------------------------------------------------------------
// Construction & validation
// ---------------------------------------------------------------------------

impl Character {
    /// Build a character from a validated create payload, assigning a
    /// fresh id.
    pub fn from_input(input: CreateCharacter) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            image_url: input.image_url,
            style: input.style,
            gender: input.gender,
            age: input.age,
            outfit: input.outfit,
            expression: input.expression,
        }
    }
}

/// Validate a create payload: non-empty trimmed name and a well-formed
/// portrait data URI.
pub fn validate_create(input: &CreateCharacter) -> Result<(), CoreError> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Character name must not be empty".to_string(),
        ));
    }
    data_uri::parse(&input.image_url)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Portrait prompt composition
// ---------------------------------------------------------------------------

/// Compose the portrait generation prompt from the creator form fields.
///
/// Free-text `details` are appended when present, and the plain-background
/// instruction always closes the prompt.
pub fn portrait_prompt(req: &PortraitRequest) -> String {
    let mut prompt = format!(
        "A portrait in {} style of a {} character, around {} years old, \
         wearing {}, with a {} expression.",
        req.style, req.gender, req.age, req.outfit, req.expression
    );
    if !req.details.trim().is_empty() {
        prompt.push_str(&format!(" Additional details: {}.", req.details.trim()));
    }
    prompt.push(' ');
    prompt.push_str(PLAIN_BACKGROUND_SUFFIX);
    prompt
}

/// Validate the portrait form: every attribute field must be non-empty.
pub fn validate_portrait_request(req: &PortraitRequest) -> Result<(), CoreError> {
    let fields = [
        ("style", &req.style),
        ("gender", &req.gender),
        ("age", &req.age),
        ("outfit", &req.outfit),
        ("expression", &req.expression),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Portrait field '{name}' must not be empty"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
