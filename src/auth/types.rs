//! Credential shapes and Intuit OAuth2 constants
//!
//! Token acquisition normally belongs to the host, which hands over either
//! a ready bearer token or the refresh credentials needed to mint one.

use chrono::{DateTime, Duration, Utc};

/// Intuit OAuth2 authorization (consent) endpoint
pub const AUTHORIZATION_URL: &str = "https://appcenter.intuit.com/connect/oauth2";

/// Intuit OAuth2 token endpoint (code exchange and refresh)
pub const TOKEN_URL: &str = "https://oauth.platform.intuit.com/oauth2/v1/tokens/bearer";

/// The single scope needed for accounting data
pub const ACCOUNTING_SCOPE: &str = "com.intuit.quickbooks.accounting";

/// Tokens this close to expiry are refreshed early
const EXPIRY_BUFFER_SECS: i64 = 30;

/// How requests are authenticated
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// Nothing is added (tests, proxies that inject credentials)
    #[default]
    None,

    /// Access token supplied by the host
    Bearer { token: String },

    /// Mint access tokens from a refresh token
    Oauth2Refresh {
        token_url: String,
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
}

impl AuthConfig {
    /// Refresh flow against the production token endpoint
    pub fn refresh(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self::Oauth2Refresh {
            token_url: TOKEN_URL.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Exchange refresh tokens at `url` instead (refresh flow only)
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        if let Self::Oauth2Refresh { token_url, .. } = &mut self {
            *token_url = url.into();
        }
        self
    }
}

/// Access token with an optional expiry
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Token that expires `seconds` from now (QBO issues one-hour tokens)
    pub fn expires_in(token: String, seconds: i64) -> Self {
        Self::new(token, Some(Utc::now() + Duration::seconds(seconds)))
    }

    /// Expired, or inside the refresh buffer
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| Utc::now() + Duration::seconds(EXPIRY_BUFFER_SECS) >= at)
    }
}
