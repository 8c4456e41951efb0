//! HTTP client for the `generateContent` endpoint.

use serde_json::json;

use scenecast_core::data_uri::InlineImage;

use crate::response::{self, GenerateContentResponse};
use crate::GenAiError;

/// Client for one generation API endpoint + model.
pub struct GenAiClient {
    http: reqwest::Client,
    /// Base API URL, e.g. `https://generativelanguage.googleapis.com`.
    api_url: String,
    api_key: String,
    model: String,
}

impl GenAiClient {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key, model)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(
        http: reqwest::Client,
        api_url: String,
        api_key: String,
        model: String,
    ) -> Self {
        Self {
            http,
            api_url,
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate one image from a prompt plus optional reference images.
    ///
    /// Reference images are sent as inline-data parts ahead of the text
    /// part. Returns the generated image as a `data:` URI. Failures are
    /// surfaced once; no retries.
    pub async fn generate(
        &self,
        prompt: &str,
        reference_images: &[InlineImage],
    ) -> Result<String, GenAiError> {
        let mut parts: Vec<serde_json::Value> = reference_images
            .iter()
            .map(|image| {
                json!({
                    "inlineData": {
                        "mimeType": image.mime_type,
                        "data": image.data,
                    }
                })
            })
            .collect();
        parts.push(json!({ "text": prompt }));

        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseModalities": ["IMAGE"] },
        });

        tracing::debug!(
            model = %self.model,
            reference_images = reference_images.len(),
            prompt_chars = prompt.len(),
            "Submitting generation request"
        );

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.api_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            // Rate limits surface either as HTTP 429 or as a
            // RESOURCE_EXHAUSTED status in the error body.
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || body.contains("RESOURCE_EXHAUSTED")
            {
                return Err(GenAiError::Quota);
            }
            return Err(GenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        response::process_response(parsed)
    }
}
