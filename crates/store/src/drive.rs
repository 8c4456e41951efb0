//! Remote drive backend: one named JSON file, overwritten wholesale.
//!
//! Every save locates the data file by name (creating it when absent)
//! and replaces its full contents with a `multipart/related` upload.
//! There is no partial update, no ETag or conflict check, and no merge:
//! the last writer wins.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use scenecast_core::library::AppData;

use crate::auth::AuthGate;
use crate::{StorageBackend, StoreError};

/// Name of the single data file kept in the user's drive.
pub const DATA_FILE_NAME: &str = "scenecast-data.json";

/// Fixed multipart boundary for upload bodies.
const UPLOAD_BOUNDARY: &str = "-------314159265358979323846";

/// Remote drive backend speaking the provider's file REST API.
pub struct DriveStore {
    http: reqwest::Client,
    /// Base API URL, e.g. `https://www.googleapis.com/drive/v3`.
    api_url: String,
    /// Base upload URL, e.g. `https://www.googleapis.com/upload/drive/v3`.
    upload_url: String,
    auth: Arc<AuthGate>,
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
struct FileRef {
    id: String,
}

impl DriveStore {
    pub fn new(api_url: String, upload_url: String, auth: Arc<AuthGate>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, upload_url, auth)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(
        http: reqwest::Client,
        api_url: String,
        upload_url: String,
        auth: Arc<AuthGate>,
    ) -> Self {
        Self {
            http,
            api_url,
            upload_url,
            auth,
            file_name: DATA_FILE_NAME.to_string(),
        }
    }

    async fn token(&self) -> Result<String, StoreError> {
        self.auth.access_token().await.ok_or(StoreError::NotSignedIn)
    }

    /// Map a non-2xx response to an error. 401/403 invalidates the cached
    /// token so the caller is forced back through the auth gate.
    async fn ensure_success(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            self.auth.invalidate().await;
            return Err(StoreError::InvalidCredential(format!(
                "Drive rejected the access token ({status}): {body}"
            )));
        }
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Find the data file by exact name (non-trashed). Returns its id.
    async fn find_file(&self, token: &str) -> Result<Option<String>, StoreError> {
        let query = format!("name='{}' and trashed=false", self.file_name);
        let response = self
            .http
            .get(format!("{}/files", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id, name)"),
                ("spaces", "drive"),
            ])
            .send()
            .await?;
        let response = self.ensure_success(response).await?;
        let list: FileList = response.json().await?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// Create the (empty) data file. Returns its id.
    async fn create_file(&self, token: &str) -> Result<String, StoreError> {
        let response = self
            .http
            .post(format!("{}/files", self.api_url))
            .bearer_auth(token)
            .query(&[("fields", "id")])
            .json(&serde_json::json!({
                "name": self.file_name,
                "mimeType": "application/json",
            }))
            .send()
            .await?;
        let response = self.ensure_success(response).await?;
        let file: FileRef = response.json().await?;
        Ok(file.id)
    }

    async fn find_or_create(&self, token: &str) -> Result<String, StoreError> {
        if let Some(id) = self.find_file(token).await? {
            return Ok(id);
        }
        match self.create_file(token).await {
            Ok(id) => {
                tracing::info!(file = %self.file_name, "Created drive data file");
                Ok(id)
            }
            Err(StoreError::InvalidCredential(msg)) => Err(StoreError::InvalidCredential(msg)),
            Err(e) => Err(StoreError::RemoteFile(format!(
                "Could not create data file '{}': {e}",
                self.file_name
            ))),
        }
    }

    /// Build the `multipart/related` body: metadata part, then content.
    fn upload_body(&self, data: &AppData) -> Result<String, StoreError> {
        let delimiter = format!("\r\n--{UPLOAD_BOUNDARY}\r\n");
        let close = format!("\r\n--{UPLOAD_BOUNDARY}--");
        let metadata = serde_json::json!({
            "name": self.file_name,
            "mimeType": "application/json",
        });
        Ok(format!(
            "{delimiter}Content-Type: application/json\r\n\r\n{}\
             {delimiter}Content-Type: application/json\r\n\r\n{}{close}",
            serde_json::to_string(&metadata)?,
            serde_json::to_string(data)?,
        ))
    }
}

#[async_trait]
impl StorageBackend for DriveStore {
    async fn load(&self) -> Result<AppData, StoreError> {
        let token = self.token().await?;
        let Some(file_id) = self.find_file(&token).await? else {
            // No file yet: an empty library, not an error.
            return Ok(AppData::default());
        };

        let response = self
            .http
            .get(format!("{}/files/{file_id}", self.api_url))
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .send()
            .await?;
        let response = self.ensure_success(response).await?;

        let bytes = response.bytes().await?;
        match serde_json::from_slice(&bytes) {
            Ok(data) => Ok(data),
            Err(e) => {
                // An empty or hand-edited file should not brick the app.
                tracing::error!(error = %e, "Corrupt drive data file, loading empty library");
                Ok(AppData::default())
            }
        }
    }

    async fn save(&self, data: &AppData) -> Result<(), StoreError> {
        let token = self.token().await?;
        let file_id = self.find_or_create(&token).await?;
        let body = self.upload_body(data)?;

        let response = self
            .http
            .patch(format!("{}/files/{file_id}", self.upload_url))
            .bearer_auth(&token)
            .query(&[("uploadType", "multipart")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;
        self.ensure_success(response).await?;

        tracing::debug!(
            characters = data.characters.len(),
            scenes = data.scenes.len(),
            "Saved library to drive"
        );
        Ok(())
    }

    /// Overwrite the remote file with an empty library. The file itself
    /// is kept.
    async fn clear(&self) -> Result<(), StoreError> {
        self.save(&AppData::default()).await?;
        tracing::info!("Cleared drive data file");
        Ok(())
    }
}
