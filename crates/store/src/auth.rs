//! Auth gate for the remote drive backend.
//!
//! A headless service has no consent popup, so [`AuthGate::sign_in`]
//! exchanges a pre-provisioned refresh token plus client credentials at
//! the provider's token endpoint and caches the resulting bearer token
//! for the session. There is no refresh handling beyond that: when the
//! token is rejected the gate is invalidated and the caller must sign in
//! again.

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::StoreError;

/// OAuth endpoints and credentials for the drive provider.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// Token endpoint, e.g. `https://oauth2.googleapis.com/token`.
    pub token_url: String,
    /// Revocation endpoint, e.g. `https://oauth2.googleapis.com/revoke`.
    pub revoke_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Refresh token provisioned out of band with file-scoped drive access.
    pub refresh_token: String,
}

/// Successful token-endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Obtains and revokes the access token gating all drive operations.
pub struct AuthGate {
    http: reqwest::Client,
    config: OAuthConfig,
    token: RwLock<Option<String>>,
}

impl AuthGate {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(http: reqwest::Client, config: OAuthConfig) -> Self {
        Self {
            http,
            config,
            token: RwLock::new(None),
        }
    }

    /// Exchange the refresh token for an access token and cache it.
    ///
    /// Returns the token on success. Any token-endpoint failure maps to
    /// [`StoreError::InvalidCredential`], which forces the caller back
    /// through this method.
    pub async fn sign_in(&self) -> Result<String, StoreError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", self.config.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StoreError::InvalidCredential(format!(
                "Token exchange failed ({status}): {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        tracing::info!(expires_in = ?token.expires_in, "Signed in to drive provider");

        *self.token.write().await = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    /// Best-effort revoke of the cached token, then drop it.
    ///
    /// Revocation failures are logged, not surfaced: the session is over
    /// either way.
    pub async fn sign_out(&self) {
        let token = self.token.write().await.take();
        let Some(token) = token else {
            return;
        };
        let result = self
            .http
            .post(&self.config.revoke_url)
            .form(&[("token", token.as_str())])
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                tracing::info!("Revoked drive access token");
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Token revocation rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token revocation request failed");
            }
        }
    }

    /// The cached access token, if signed in.
    pub async fn access_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Drop the cached token without revoking (used when the remote API
    /// rejects it).
    pub async fn invalidate(&self) {
        if self.token.write().await.take().is_some() {
            tracing::warn!("Cached drive token invalidated, sign-in required");
        }
    }

    pub async fn is_signed_in(&self) -> bool {
        self.token.read().await.is_some()
    }
}
