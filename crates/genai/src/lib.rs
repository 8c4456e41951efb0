//! Client for the external multimodal image-generation API.
//!
//! [`GenAiClient::generate`] submits a text prompt plus optional
//! reference images and returns the generated image as a `data:` URI.
//! Upstream failure shapes are normalized into [`GenAiError`]; nothing
//! in this crate retries, so every failure surfaces exactly once.

pub mod client;
pub mod response;

pub use client::GenAiClient;

/// Default model used for portrait and scene generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Errors from the generation client, with user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The prompt was blocked before generation started.
    #[error("The request was blocked for safety reasons: {reason}. Please try a different prompt.")]
    Blocked { reason: String },

    /// The response carried no candidates at all.
    #[error("The model produced no result. This is often a safety filter; please try a different prompt.")]
    NoCandidates,

    /// A candidate came back, but generation stopped for a non-success
    /// reason. `message` is the user-facing text mapped from `reason`.
    #[error("{message}")]
    Stopped { reason: String, message: String },

    /// Finish reason was success but no image payload was present.
    #[error("The model response was malformed or contained no image. Please try again.")]
    MissingImage,

    /// Upstream rate limit or exhausted usage quota.
    #[error("The service is overloaded or your usage quota is exhausted. Please try again in a few minutes.")]
    Quota,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code (other than quota shapes).
    #[error("Generation API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}
