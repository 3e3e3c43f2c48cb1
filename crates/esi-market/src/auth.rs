//! EVE SSO refresh-token exchange.
//!
//! One POST against the SSO token endpoint. No token caching and no refresh
//! scheduling: callers hold the refresh token and ask for a fresh access
//! token when an authenticated endpoint needs one.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Default EVE SSO token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://login.eveonline.com/v2/oauth/token";

/// Token exchanges are small; keep the timeout short.
const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the SSO exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SSO returned status {status}: {body}")]
    Api { status: u16, body: String },
}

/// Configuration for the SSO client.
#[derive(Debug, Clone)]
pub struct SsoConfig {
    /// Token endpoint URL.
    pub token_url: String,
    /// Application client id from the developer portal.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
}

impl SsoConfig {
    /// Config for the production SSO with the given application credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

/// Access token returned by the SSO.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Seconds until expiry.
    pub expires_in: i64,
    pub token_type: String,
    /// The SSO may rotate the refresh token on exchange.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Client for the EVE SSO token endpoint.
#[derive(Debug, Clone)]
pub struct SsoClient {
    http: Client,
    config: SsoConfig,
}

impl SsoClient {
    pub fn new(config: SsoConfig) -> Self {
        let http = Client::builder()
            .timeout(TOKEN_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { http, config }
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        debug!(url = %self.config.token_url, "Exchanging refresh token");

        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<AccessToken>().await?)
    }
}
