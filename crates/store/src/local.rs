//! On-disk backend: the library as two JSON documents in a data directory.
//!
//! `characters.json` and `scenes.json` are written atomically (temp file
//! plus rename) and each is subject to a byte budget, so a save that
//! exceeds capacity fails without touching what was previously persisted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use scenecast_core::character::Character;
use scenecast_core::library::AppData;
use scenecast_core::scene::Scene;

use crate::{StorageBackend, StoreError};

/// File holding the character list.
pub const CHARACTERS_FILE: &str = "characters.json";

/// File holding the scene list.
pub const SCENES_FILE: &str = "scenes.json";

/// Default per-document byte budget (5 MiB).
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Local filesystem backend.
pub struct LocalStore {
    data_dir: PathBuf,
    quota_bytes: u64,
}

impl LocalStore {
    /// Create a backend rooted at `data_dir` with the default byte budget.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_quota(data_dir, DEFAULT_QUOTA_BYTES)
    }

    /// Create a backend with an explicit per-document byte budget.
    pub fn with_quota(data_dir: impl Into<PathBuf>, quota_bytes: u64) -> Self {
        Self {
            data_dir: data_dir.into(),
            quota_bytes,
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Read one document, tolerating absence and corruption: both load as
    /// an empty list (corruption is logged, never surfaced).
    async fn read_list<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.path(file);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::error!(file, error = %e, "Corrupt local data file, loading empty list");
                Ok(Vec::new())
            }
        }
    }

    /// Serialize one document and check it against the byte budget
    /// WITHOUT writing anything.
    fn encode_checked<T: Serialize>(&self, file: &str, list: &[T]) -> Result<Vec<u8>, StoreError> {
        let payload = serde_json::to_vec(list)?;
        if payload.len() as u64 > self.quota_bytes {
            return Err(StoreError::StorageFull(format!(
                "{file} would be {} bytes, budget is {} bytes",
                payload.len(),
                self.quota_bytes
            )));
        }
        Ok(payload)
    }

    /// Write a document atomically: temp sibling, then rename over the
    /// previous file.
    async fn write_atomic(&self, file: &str, payload: &[u8]) -> Result<(), StoreError> {
        let path = self.path(file);
        let tmp = self.path(&format!("{file}.tmp"));
        tokio::fs::write(&tmp, payload)
            .await
            .map_err(map_disk_full)?;
        tokio::fs::rename(&tmp, &path).await.map_err(map_disk_full)?;
        Ok(())
    }
}

/// Surface OS disk-full conditions as the storage-full error, so callers
/// see one capacity condition regardless of whether the budget or the
/// disk ran out first.
fn map_disk_full(e: std::io::Error) -> StoreError {
    if e.kind() == ErrorKind::StorageFull {
        StoreError::StorageFull(e.to_string())
    } else {
        StoreError::Io(e)
    }
}

async fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl StorageBackend for LocalStore {
    async fn load(&self) -> Result<AppData, StoreError> {
        let characters: Vec<Character> = self.read_list(CHARACTERS_FILE).await?;
        let scenes: Vec<Scene> = self.read_list(SCENES_FILE).await?;
        Ok(AppData { characters, scenes })
    }

    async fn save(&self, data: &AppData) -> Result<(), StoreError> {
        // Budget-check both documents before the first write, so a
        // capacity failure leaves the previous state fully intact.
        let characters = self.encode_checked(CHARACTERS_FILE, &data.characters)?;
        let scenes = self.encode_checked(SCENES_FILE, &data.scenes)?;

        tokio::fs::create_dir_all(&self.data_dir).await?;
        self.write_atomic(CHARACTERS_FILE, &characters).await?;
        self.write_atomic(SCENES_FILE, &scenes).await?;

        tracing::debug!(
            characters = data.characters.len(),
            scenes = data.scenes.len(),
            "Saved library to local storage"
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        remove_if_present(&self.path(CHARACTERS_FILE)).await?;
        remove_if_present(&self.path(SCENES_FILE)).await?;
        tracing::info!("Cleared local storage");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
