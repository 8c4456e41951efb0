//! Fixed-delay autosave flusher.
//!
//! Handlers persist synchronously after each mutation; this task is the
//! safety net that flushes any library state still marked dirty (for
//! example when the process is asked to shut down between a mutation and
//! its save). Runs on a fixed interval until cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use scenecast_store::Store;

use crate::state::LibraryState;

/// Run the autosave loop.
///
/// Flushes dirty library state every `delay`. Runs until `cancel` is
/// triggered, then performs one final flush so a clean shutdown never
/// loses pending state.
pub async fn run(
    library: Arc<LibraryState>,
    store: Arc<Store>,
    delay: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(delay_secs = delay.as_secs(), "Autosave task started");

    let mut interval = tokio::time::interval(delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Autosave task stopping");
                break;
            }
            _ = interval.tick() => {
                match library.flush(&store).await {
                    Ok(true) => tracing::debug!("Autosave: flushed pending library state"),
                    Ok(false) => {}
                    Err(e) => tracing::error!(error = %e, "Autosave: flush failed"),
                }
            }
        }
    }

    // Final flush on the way out.
    if let Err(e) = library.flush(&store).await {
        tracing::error!(error = %e, "Autosave: final flush failed");
    }
}
