//! Storage adapter for the scenecast library.
//!
//! One contract, two backends: [`LocalStore`] persists the library as
//! JSON documents on disk, [`DriveStore`] keeps a single remote file
//! behind an OAuth access token obtained through the [`AuthGate`].
//! The [`Store`] front owns both and dispatches on [`StorageMode`];
//! switching modes never migrates data between backends.

pub mod auth;
pub mod drive;
pub mod local;

use async_trait::async_trait;

use scenecast_core::library::AppData;
use scenecast_core::CoreError;

pub use auth::AuthGate;
pub use drive::DriveStore;
pub use local::LocalStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the storage layer and the auth gate.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The local backend ran out of room (byte budget or OS disk-full).
    #[error("Storage is full: {0}")]
    StorageFull(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote API returned a non-2xx status code.
    #[error("Remote API error ({status}): {body}")]
    Api {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The access token was rejected; the caller must sign in again.
    #[error("Invalid or expired credential: {0}")]
    InvalidCredential(String),

    /// A drive operation was attempted with no cached access token.
    #[error("Not signed in to the remote backend")]
    NotSignedIn,

    /// The remote data file could not be found or created.
    #[error("Remote data file error: {0}")]
    RemoteFile(String),
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The active persistence backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Local,
    Drive,
}

impl StorageMode {
    /// Parse from the wire/config name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "local" => Ok(Self::Local),
            "drive" => Ok(Self::Drive),
            other => Err(CoreError::Validation(format!(
                "Unknown storage mode '{other}'. Must be one of: local, drive"
            ))),
        }
    }

    /// Wire/config name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Drive => "drive",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "This Device",
            Self::Drive => "Cloud Drive",
        }
    }
}

// ---------------------------------------------------------------------------
// Backend contract
// ---------------------------------------------------------------------------

/// Uniform load/save/clear contract implemented by both backends.
///
/// Every save replaces the full library; there is no partial update,
/// merging, or conflict detection anywhere in this layer.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn load(&self) -> Result<AppData, StoreError>;
    async fn save(&self, data: &AppData) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Front
// ---------------------------------------------------------------------------

/// Owns both backends and dispatches per call on [`StorageMode`].
pub struct Store {
    local: LocalStore,
    drive: DriveStore,
}

impl Store {
    pub fn new(local: LocalStore, drive: DriveStore) -> Self {
        Self { local, drive }
    }

    fn backend(&self, mode: StorageMode) -> &dyn StorageBackend {
        match mode {
            StorageMode::Local => &self.local,
            StorageMode::Drive => &self.drive,
        }
    }

    pub async fn load(&self, mode: StorageMode) -> Result<AppData, StoreError> {
        self.backend(mode).load().await
    }

    pub async fn save(&self, mode: StorageMode, data: &AppData) -> Result<(), StoreError> {
        self.backend(mode).save(data).await
    }

    pub async fn clear(&self, mode: StorageMode) -> Result<(), StoreError> {
        self.backend(mode).clear().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
