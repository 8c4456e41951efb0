//! Shared application state and the in-memory library it guards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use scenecast_core::library::AppData;
use scenecast_core::quota::SessionQuota;
use scenecast_core::CoreError;
use scenecast_genai::GenAiClient;
use scenecast_store::{AuthGate, StorageMode, Store, StoreError};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`. Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Storage adapter (both backends).
    pub store: Arc<Store>,
    /// Image generation client.
    pub genai: Arc<GenAiClient>,
    /// Auth gate for the drive backend.
    pub auth: Arc<AuthGate>,
    /// The in-memory library and its persistence bookkeeping.
    pub library: Arc<LibraryState>,
    /// Session quota for AI portrait generations.
    pub quota: Arc<SessionQuota>,
}

/// The library held in memory, with the active storage mode and a dirty
/// flag driving persistence.
///
/// All mutations and flushes go through one async mutex, so at most one
/// persistence write is ever in flight and writes land in mutation order.
pub struct LibraryState {
    data: Mutex<AppData>,
    mode: RwLock<StorageMode>,
    dirty: AtomicBool,
}

impl LibraryState {
    pub fn new(mode: StorageMode, data: AppData) -> Self {
        Self {
            data: Mutex::new(data),
            mode: RwLock::new(mode),
            dirty: AtomicBool::new(false),
        }
    }

    /// The active persistence mode.
    pub async fn mode(&self) -> StorageMode {
        *self.mode.read().await
    }

    /// Run a read-only closure against the library.
    pub async fn read<T>(&self, f: impl FnOnce(&AppData) -> T) -> T {
        f(&*self.data.lock().await)
    }

    /// Apply a mutation and immediately persist the result through the
    /// active backend.
    ///
    /// The in-memory change survives a failed save (the dirty flag is
    /// consumed either way, so nothing re-persists automatically); the
    /// persistence error is surfaced to the caller exactly once.
    pub async fn mutate<T>(
        &self,
        store: &Store,
        f: impl FnOnce(&mut AppData) -> Result<T, CoreError>,
    ) -> Result<T, AppError> {
        let mut data = self.data.lock().await;
        let value = f(&mut data)?;
        self.dirty.store(true, Ordering::Relaxed);

        let mode = *self.mode.read().await;
        let result = store.save(mode, &data).await;
        self.dirty.store(false, Ordering::Relaxed);
        result?;
        Ok(value)
    }

    /// Persist the current library if anything is pending. Used by the
    /// autosave flusher and the shutdown path.
    pub async fn flush(&self, store: &Store) -> Result<bool, StoreError> {
        if !self.dirty.swap(false, Ordering::Relaxed) {
            return Ok(false);
        }
        let data = self.data.lock().await;
        let mode = *self.mode.read().await;
        store.save(mode, &data).await?;
        Ok(true)
    }

    /// Switch the active mode and adopt the new backend's data.
    ///
    /// Nothing is copied between backends; the mode only changes after
    /// the new backend loads successfully.
    pub async fn switch_mode(
        &self,
        store: &Store,
        new_mode: StorageMode,
    ) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let mut mode = self.mode.write().await;
        if *mode == new_mode {
            return Ok(());
        }
        let loaded = store.load(new_mode).await?;
        *mode = new_mode;
        *data = loaded;
        self.dirty.store(false, Ordering::Relaxed);
        tracing::info!(mode = new_mode.name(), "Switched storage mode");
        Ok(())
    }

    /// Re-read the library from the active backend, replacing memory.
    pub async fn reload(&self, store: &Store) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let mode = *self.mode.read().await;
        *data = store.load(mode).await?;
        self.dirty.store(false, Ordering::Relaxed);
        Ok(())
    }

    /// Clear the active backend and reset the in-memory library.
    pub async fn clear(&self, store: &Store) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let mode = *self.mode.read().await;
        store.clear(mode).await?;
        *data = AppData::default();
        self.dirty.store(false, Ordering::Relaxed);
        Ok(())
    }
}
