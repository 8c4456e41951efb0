use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scenecast_api::config::ServerConfig;
use scenecast_api::router::build_app_router;
use scenecast_api::state::{AppState, LibraryState};
use scenecast_api::background;
use scenecast_core::library::AppData;
use scenecast_core::quota::SessionQuota;
use scenecast_genai::GenAiClient;
use scenecast_store::auth::AuthGate;
use scenecast_store::{DriveStore, LocalStore, StorageMode, Store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scenecast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    if config.genai_api_key.is_empty() {
        tracing::warn!("GENAI_API_KEY is not set; generation endpoints will be rejected upstream");
    }

    // --- Storage adapter + auth gate ---
    // One HTTP client pool shared by the drive backend, the auth gate,
    // and the generation client.
    let http = reqwest::Client::new();

    let auth = Arc::new(AuthGate::with_client(http.clone(), config.oauth.clone()));
    let local = LocalStore::with_quota(&config.data_dir, config.local_quota_bytes);
    let drive = DriveStore::with_client(
        http.clone(),
        config.drive_api_url.clone(),
        config.drive_upload_url.clone(),
        Arc::clone(&auth),
    );
    let store = Arc::new(Store::new(local, drive));

    // --- Generation client ---
    let genai = Arc::new(GenAiClient::with_client(
        http,
        config.genai_api_url.clone(),
        config.genai_api_key.clone(),
        config.genai_model.clone(),
    ));

    // --- Initial library load ---
    let mode = StorageMode::from_name(&config.storage_mode)
        .expect("STORAGE_MODE must be 'local' or 'drive'");
    let data = match store.load(mode).await {
        Ok(data) => {
            tracing::info!(
                mode = mode.name(),
                characters = data.characters.len(),
                scenes = data.scenes.len(),
                "Library loaded"
            );
            data
        }
        Err(e) => {
            // Drive mode before sign-in lands here; the library starts
            // empty and can be reloaded after authentication.
            tracing::warn!(mode = mode.name(), error = %e, "Initial load failed, starting empty");
            AppData::default()
        }
    };
    let library = Arc::new(LibraryState::new(mode, data));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::clone(&store),
        genai,
        auth,
        library: Arc::clone(&library),
        quota: Arc::new(SessionQuota::new(config.portrait_session_limit)),
    };

    // --- Autosave ---
    let autosave_cancel = tokio_util::sync::CancellationToken::new();
    let autosave_handle = tokio::spawn(background::autosave::run(
        Arc::clone(&library),
        Arc::clone(&store),
        Duration::from_secs(config.autosave_delay_secs),
        autosave_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Stop the autosave loop; it performs a final flush before exiting.
    autosave_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), autosave_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
