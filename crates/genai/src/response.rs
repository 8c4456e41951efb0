//! Wire types and result classification for `generateContent` responses.
//!
//! A response is rejected in a fixed order: upfront block, empty
//! candidate list, non-success finish reason, then missing image
//! payload. Only a `STOP` finish with an inline image part succeeds.

use serde::Deserialize;

use scenecast_core::data_uri;

use crate::GenAiError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Map a non-`STOP` finish reason to its user-facing message.
fn finish_reason_message(reason: &str) -> String {
    match reason {
        "NO_IMAGE" | "SAFETY" => {
            "The model could not generate an image for this request due to its safety \
             policy. Please adjust your description and try again."
                .to_string()
        }
        "RECITATION" => {
            "Your request may involve copyrighted material. Please adjust your \
             description and try again."
                .to_string()
        }
        "OTHER" => "An unknown error occurred during image generation. Please try again later."
            .to_string(),
        other => format!(
            "Image generation stopped with reason: {other}. Please try a different prompt."
        ),
    }
}

/// Classify a response into the generated image (as a `data:` URI) or a
/// [`GenAiError`].
pub fn process_response(response: GenerateContentResponse) -> Result<String, GenAiError> {
    // Case 1: the prompt was blocked before generation started.
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Err(GenAiError::Blocked { reason });
    }

    // Case 2: no candidates at all, usually a post-prompt safety drop.
    let Some(candidate) = response.candidates.into_iter().next() else {
        tracing::error!("Generation response carried no candidates");
        return Err(GenAiError::NoCandidates);
    };

    // Case 3: a candidate stopped for a reason other than success.
    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            return Err(GenAiError::Stopped {
                message: finish_reason_message(reason),
                reason: reason.to_string(),
            });
        }
    }

    // Case 4: successful finish but no image payload.
    let image = candidate
        .content
        .unwrap_or_default()
        .parts
        .into_iter()
        .find_map(|p| p.inline_data);
    let Some(image) = image else {
        tracing::error!("Generation response finished STOP but carried no image data");
        return Err(GenAiError::MissingImage);
    };

    Ok(data_uri::from_base64(&image.mime_type, &image.data))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
