//! Applies credentials to outgoing requests
//!
//! For the refresh flow the access token and the latest refresh token are
//! kept behind one lock, so a rotation is always stored together with the
//! access token it produced.

use super::types::{AuthConfig, CachedToken, ACCOUNTING_SCOPE, AUTHORIZATION_URL};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

#[derive(Debug, Default)]
struct TokenState {
    access: Option<CachedToken>,
    /// Intuit may hand back a new one on every exchange
    refresh_token: Option<String>,
}

impl TokenState {
    fn valid_access(&self) -> Option<String> {
        self.access
            .as_ref()
            .filter(|token| !token.is_expired())
            .map(|token| token.token.clone())
    }
}

/// Adds `Authorization` to requests, refreshing the access token when needed
pub struct Authenticator {
    config: AuthConfig,
    state: RwLock<TokenState>,
    http_client: Client,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Token exchanges go through `http_client`
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        let refresh_token = match &config {
            AuthConfig::Oauth2Refresh { refresh_token, .. } => Some(refresh_token.clone()),
            _ => None,
        };
        Self {
            config,
            state: RwLock::new(TokenState {
                access: None,
                refresh_token,
            }),
            http_client,
        }
    }

    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),
            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),
            AuthConfig::Oauth2Refresh {
                token_url,
                client_id,
                client_secret,
                ..
            } => {
                let token = self.access_token(token_url, client_id, client_secret).await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    async fn access_token(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String> {
        let cached = self.state.read().await.valid_access();
        if let Some(token) = cached {
            return Ok(token);
        }

        let mut state = self.state.write().await;
        // Another request may have refreshed while this one waited
        if let Some(token) = state.valid_access() {
            return Ok(token);
        }

        let current = state
            .refresh_token
            .clone()
            .ok_or_else(|| Error::missing_field("refresh_token"))?;
        let TokenResponse {
            access_token,
            expires_in,
            refresh_token: rotated,
        } = self
            .exchange(token_url, client_id, client_secret, &current)
            .await?;

        if let Some(rotated) = rotated {
            if rotated != current {
                info!("Intuit rotated the refresh token");
            }
            state.refresh_token = Some(rotated);
        }
        state.access = Some(match expires_in {
            Some(seconds) => CachedToken::expires_in(access_token.clone(), seconds),
            None => CachedToken::new(access_token.clone(), None),
        });

        Ok(access_token)
    }

    /// `grant_type=refresh_token` with HTTP Basic client authentication
    async fn exchange(
        &self,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse> {
        debug!("Refreshing QBO access token at {token_url}");
        let response = self
            .http_client
            .post(token_url)
            .basic_auth(client_id, Some(client_secret))
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                message: format!("HTTP {}: {body}", status.as_u16()),
            });
        }
        Ok(response.json().await?)
    }

    /// Latest refresh token, after any rotation
    pub async fn current_refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    /// Drop the access token so the next request refreshes
    pub async fn clear_cache(&self) {
        self.state.write().await.access = None;
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Consent URL that starts the authorization-code grant
pub fn authorization_url(client_id: &str, redirect_uri: &str, state: &str) -> Result<Url> {
    Ok(Url::parse_with_params(
        AUTHORIZATION_URL,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("scope", ACCOUNTING_SCOPE),
            ("redirect_uri", redirect_uri),
            ("state", state),
        ],
    )?)
}
