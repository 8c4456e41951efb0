//! `data:` URI handling and reference-image intake rules.
//!
//! Portraits and composites travel through the system as
//! `data:{mime};base64,{payload}` strings; the generation client needs
//! the mime type and raw base64 payload split back out.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::io::Cursor;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum decoded size of an uploaded reference image (5 MB).
pub const MAX_REFERENCE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Mime types accepted for uploaded reference images.
pub const ACCEPTED_IMAGE_MIMES: &[&str] = &["image/png", "image/jpeg"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An inline image: mime type plus base64 payload, ready to embed in a
/// generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64-encoded image bytes (no data-URI header).
    pub data: String,
}

// ---------------------------------------------------------------------------
// Encode / parse
// ---------------------------------------------------------------------------

/// Encode raw image bytes as a `data:` URI.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(bytes))
}

/// Build a `data:` URI from an already base64-encoded payload.
pub fn from_base64(mime_type: &str, payload: &str) -> String {
    format!("data:{mime_type};base64,{payload}")
}

/// Split a `data:` URI into its mime type and base64 payload.
///
/// A missing mime type defaults to `image/png`, matching what browsers
/// emit for canvas exports.
pub fn parse(uri: &str) -> Result<InlineImage, CoreError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Validation("Image must be a data: URI".to_string()))?;
    let (header, data) = rest
        .split_once(",")
        .ok_or_else(|| CoreError::Validation("Malformed data: URI (no payload)".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(CoreError::Validation(
            "Image data URI must be base64-encoded".to_string(),
        ));
    }
    let mime_type = header.trim_end_matches(";base64");
    let mime_type = if mime_type.is_empty() {
        "image/png"
    } else {
        mime_type
    };
    if data.is_empty() {
        return Err(CoreError::Validation(
            "Image data URI has an empty payload".to_string(),
        ));
    }
    Ok(InlineImage {
        mime_type: mime_type.to_string(),
        data: data.to_string(),
    })
}

/// Decode the base64 payload of an already-parsed inline image.
pub fn decode_payload(image: &InlineImage) -> Result<Vec<u8>, CoreError> {
    BASE64
        .decode(&image.data)
        .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))
}

// ---------------------------------------------------------------------------
// Reference-image intake
// ---------------------------------------------------------------------------

/// Validate an uploaded reference image: accepted mime type, size cap,
/// and a readable image header. Returns `(width, height)`.
pub fn probe_reference_image(image: &InlineImage) -> Result<(u32, u32), CoreError> {
    if !ACCEPTED_IMAGE_MIMES.contains(&image.mime_type.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported image type '{}'. Must be one of: {}",
            image.mime_type,
            ACCEPTED_IMAGE_MIMES.join(", ")
        )));
    }
    let bytes = decode_payload(image)?;
    if bytes.len() > MAX_REFERENCE_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "Image is too large ({} bytes). Maximum is {MAX_REFERENCE_IMAGE_BYTES} bytes",
            bytes.len()
        )));
    }
    // Header-only dimension probe; never decodes the full image.
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CoreError::Validation(format!("Unreadable image data: {e}")))?
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("Not a valid image: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
