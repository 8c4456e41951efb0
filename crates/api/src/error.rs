use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use scenecast_core::CoreError;
use scenecast_genai::GenAiError;
use scenecast_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of the core, store, and generation crates and
/// implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    GenAi(#[from] GenAiError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(store) => classify_store_error(store),
            AppError::GenAi(genai) => classify_genai_error(genai),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::QuotaExceeded(msg) => {
            (StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXCEEDED", msg.clone())
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Storage-layer failures. Credential problems force the client back
/// through the sign-in flow.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::StorageFull(msg) => (
            StatusCode::INSUFFICIENT_STORAGE,
            "STORAGE_FULL",
            format!("Local storage is full: {msg}"),
        ),
        StoreError::InvalidCredential(msg) => {
            tracing::warn!(error = %msg, "Drive credential rejected");
            (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIAL",
                "Your drive session is no longer valid. Please sign in again.".to_string(),
            )
        }
        StoreError::NotSignedIn => (
            StatusCode::UNAUTHORIZED,
            "NOT_SIGNED_IN",
            "Sign in to the drive provider to use drive storage.".to_string(),
        ),
        StoreError::RemoteFile(msg) => (StatusCode::BAD_GATEWAY, "REMOTE_FILE", msg.clone()),
        StoreError::Api { status, body } => {
            tracing::error!(status, body = %body, "Drive API error");
            (
                StatusCode::BAD_GATEWAY,
                "REMOTE_API_ERROR",
                "The drive service returned an error. Please try again.".to_string(),
            )
        }
        StoreError::Request(e) => {
            tracing::error!(error = %e, "Drive request failed");
            (
                StatusCode::BAD_GATEWAY,
                "REMOTE_UNREACHABLE",
                "Could not reach the drive service. Please check your connection.".to_string(),
            )
        }
        StoreError::Io(e) => {
            tracing::error!(error = %e, "Local storage I/O error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        StoreError::Serialization(e) => {
            tracing::error!(error = %e, "Library serialization error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Generation failures, mapped per the upstream failure classes. Safety
/// outcomes are client errors (the prompt must change); malformed
/// responses are upstream faults.
fn classify_genai_error(err: &GenAiError) -> (StatusCode, &'static str, String) {
    match err {
        GenAiError::Blocked { .. } | GenAiError::NoCandidates | GenAiError::Stopped { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "CONTENT_BLOCKED",
            err.to_string(),
        ),
        GenAiError::Quota => (StatusCode::TOO_MANY_REQUESTS, "QUOTA_EXCEEDED", err.to_string()),
        GenAiError::MissingImage => (
            StatusCode::BAD_GATEWAY,
            "UPSTREAM_INVALID",
            err.to_string(),
        ),
        GenAiError::Api { status, body } => {
            tracing::error!(status, body = %body, "Generation API error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The generation service returned an error. Please try again.".to_string(),
            )
        }
        GenAiError::Request(e) => {
            tracing::error!(error = %e, "Generation request failed");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNREACHABLE",
                "Could not reach the generation service. Please check your connection.".to_string(),
            )
        }
    }
}
