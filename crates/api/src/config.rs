use scenecast_store::auth::OAuthConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,

    /// Directory for the local storage backend (default: `./data`).
    pub data_dir: String,
    /// Per-document byte budget for the local backend (default: 5 MiB).
    pub local_quota_bytes: u64,
    /// Storage mode active at startup: `local` or `drive` (default: `local`).
    pub storage_mode: String,
    /// Delay between autosave flushes in seconds (default: `3`).
    pub autosave_delay_secs: u64,

    /// Base URL of the image generation API.
    pub genai_api_url: String,
    /// API key for the image generation API (empty disables generation).
    pub genai_api_key: String,
    /// Model used for portrait and scene generation.
    pub genai_model: String,
    /// AI portrait generations allowed per server session (default: `5`).
    pub portrait_session_limit: u32,

    /// Base URL of the drive file API.
    pub drive_api_url: String,
    /// Base URL of the drive upload API.
    pub drive_upload_url: String,
    /// OAuth endpoints and credentials for the drive provider.
    pub oauth: OAuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                                        |
    /// |--------------------------|------------------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                                      |
    /// | `PORT`                   | `3000`                                         |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`                        |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                           |
    /// | `DATA_DIR`               | `./data`                                       |
    /// | `LOCAL_QUOTA_BYTES`      | `5242880`                                      |
    /// | `STORAGE_MODE`           | `local`                                        |
    /// | `AUTOSAVE_DELAY_SECS`    | `3`                                            |
    /// | `GENAI_API_URL`          | `https://generativelanguage.googleapis.com`    |
    /// | `GENAI_API_KEY`          | (empty)                                        |
    /// | `GENAI_MODEL`            | `gemini-2.5-flash-image`                       |
    /// | `PORTRAIT_SESSION_LIMIT` | `5`                                            |
    /// | `DRIVE_API_URL`          | `https://www.googleapis.com/drive/v3`          |
    /// | `DRIVE_UPLOAD_URL`       | `https://www.googleapis.com/upload/drive/v3`   |
    /// | `OAUTH_TOKEN_URL`        | `https://oauth2.googleapis.com/token`          |
    /// | `OAUTH_REVOKE_URL`       | `https://oauth2.googleapis.com/revoke`         |
    /// | `OAUTH_CLIENT_ID`        | (empty)                                        |
    /// | `OAUTH_CLIENT_SECRET`    | (empty)                                        |
    /// | `OAUTH_REFRESH_TOKEN`    | (empty)                                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into());

        let local_quota_bytes: u64 = std::env::var("LOCAL_QUOTA_BYTES")
            .unwrap_or_else(|_| scenecast_store::local::DEFAULT_QUOTA_BYTES.to_string())
            .parse()
            .expect("LOCAL_QUOTA_BYTES must be a valid u64");

        let storage_mode = std::env::var("STORAGE_MODE").unwrap_or_else(|_| "local".into());

        let autosave_delay_secs: u64 = std::env::var("AUTOSAVE_DELAY_SECS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("AUTOSAVE_DELAY_SECS must be a valid u64");

        let genai_api_url = std::env::var("GENAI_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into());
        let genai_api_key = std::env::var("GENAI_API_KEY").unwrap_or_default();
        let genai_model =
            std::env::var("GENAI_MODEL").unwrap_or_else(|_| scenecast_genai::DEFAULT_MODEL.into());

        let portrait_session_limit: u32 = std::env::var("PORTRAIT_SESSION_LIMIT")
            .unwrap_or_else(|_| scenecast_core::quota::DEFAULT_PORTRAIT_LIMIT.to_string())
            .parse()
            .expect("PORTRAIT_SESSION_LIMIT must be a valid u32");

        let drive_api_url = std::env::var("DRIVE_API_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".into());
        let drive_upload_url = std::env::var("DRIVE_UPLOAD_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/upload/drive/v3".into());

        let oauth = OAuthConfig {
            token_url: std::env::var("OAUTH_TOKEN_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".into()),
            revoke_url: std::env::var("OAUTH_REVOKE_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/revoke".into()),
            client_id: std::env::var("OAUTH_CLIENT_ID").unwrap_or_default(),
            client_secret: std::env::var("OAUTH_CLIENT_SECRET").unwrap_or_default(),
            refresh_token: std::env::var("OAUTH_REFRESH_TOKEN").unwrap_or_default(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            data_dir,
            local_quota_bytes,
            storage_mode,
            autosave_delay_secs,
            genai_api_url,
            genai_api_key,
            genai_model,
            portrait_session_limit,
            drive_api_url,
            drive_upload_url,
            oauth,
        }
    }
}
