//! GET transport for the QBO API
//!
//! Owns retries, backoff, client-side throttling and credentials. Callers
//! get either a successful response or the final error; nothing above this
//! layer retries.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use bytes::Bytes;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Wait applied to a 429 that carries no usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub kind: BackoffType,
    pub initial: Duration,
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            kind: BackoffType::Exponential,
            initial: Duration::from_millis(250),
            max: Duration::from_secs(30),
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt + 1`, capped at `max`
    pub fn delay(&self, attempt: u32) -> Duration {
        let delay = match self.kind {
            BackoffType::Constant => self.initial,
            BackoffType::Linear => self.initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => self.initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.max)
    }
}

/// Transport settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff: Backoff,
    /// `None` disables client-side throttling
    pub rate_limit: Option<RateLimiterConfig>,
    /// Sent with every request, before per-request headers
    pub default_headers: Vec<(String, String)>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            backoff: Backoff::default(),
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: Vec::new(),
            user_agent: format!("qbo-sync/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn backoff(mut self, kind: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff = Backoff { kind, initial, max };
        self
    }

    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((key.into(), value.into()));
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Per-request options; query parameters keep their insertion order
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// Overrides the client timeout
    pub timeout: Option<Duration>,
    /// Overrides the client retry budget
    pub max_retries: Option<u32>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

/// What a single send produced
enum Outcome {
    Success(Response),
    /// 401; worth one more try after dropping a refreshable token
    Unauthorized(Error),
    Retry { delay: Duration, error: Error },
    Fail(Error),
}

/// HTTP client with retry, throttling and credentials
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Client with default settings and no credentials
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: None,
            rate_limiter,
        })
    }

    /// Client whose token refreshes share the same connection pool
    pub fn with_auth(config: HttpClientConfig, auth: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = Some(Authenticator::with_client(auth, client.client.clone()));
        Ok(client)
    }

    pub fn authenticator(&self) -> Option<&Authenticator> {
        self.authenticator.as_ref()
    }

    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// GET `url`, retrying transient failures
    pub async fn get(&self, url: &str, request: &RequestConfig) -> Result<Response> {
        let max_retries = request.max_retries.unwrap_or(self.config.max_retries);
        let mut attempt = 0;
        let mut reauthenticated = false;

        loop {
            match self.send_once(url, request, attempt).await {
                Outcome::Success(response) => {
                    debug!("GET {url} -> {}", response.status());
                    return Ok(response);
                }
                Outcome::Unauthorized(_) if !reauthenticated && self.can_refresh() => {
                    reauthenticated = true;
                    warn!("Access token rejected for {url}, refreshing");
                    if let Some(auth) = &self.authenticator {
                        auth.clear_cache().await;
                    }
                }
                Outcome::Retry { delay, error } if attempt < max_retries => {
                    attempt += 1;
                    warn!("GET {url} failed ({error}), retry {attempt}/{max_retries} in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
                Outcome::Retry { error, .. } | Outcome::Unauthorized(error) | Outcome::Fail(error) => {
                    return Err(error);
                }
            }
        }
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, request: &RequestConfig) -> Result<T> {
        let body = self.get(url, request).await?.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON from {url}: {e}")))
    }

    /// GET an opaque body
    pub async fn get_bytes(&self, url: &str, request: &RequestConfig) -> Result<Bytes> {
        Ok(self.get(url, request).await?.bytes().await?)
    }

    /// Delay before retry number `attempt + 1`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        self.config.backoff.delay(attempt)
    }

    fn can_refresh(&self) -> bool {
        self.authenticator
            .as_ref()
            .is_some_and(|auth| matches!(auth.config(), AuthConfig::Oauth2Refresh { .. }))
    }

    async fn send_once(&self, url: &str, request: &RequestConfig, attempt: u32) -> Outcome {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let timeout = request.timeout.unwrap_or(self.config.timeout);
        let mut req = self.client.get(url).timeout(timeout);
        for (key, value) in self.config.default_headers.iter().chain(&request.headers) {
            req = req.header(key.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(auth) = &self.authenticator {
            req = match auth.apply(req).await {
                Ok(req) => req,
                Err(e) => return Outcome::Fail(e),
            };
        }

        match req.send().await {
            Ok(response) => self.classify(response, attempt).await,
            Err(e) if e.is_timeout() => Outcome::Retry {
                delay: self.calculate_backoff(attempt),
                error: Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                },
            },
            Err(e) if e.is_connect() => Outcome::Retry {
                delay: self.calculate_backoff(attempt),
                error: Error::Http(e),
            },
            Err(e) => Outcome::Fail(Error::Http(e)),
        }
    }

    async fn classify(&self, response: Response, attempt: u32) -> Outcome {
        let status = response.status();
        if status.is_success() {
            return Outcome::Success(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let seconds = retry_after(&response);
            return Outcome::Retry {
                delay: Duration::from_secs(seconds),
                error: Error::RateLimited {
                    retry_after_seconds: seconds,
                },
            };
        }

        // QBO explains query syntax errors and auth failures in the body
        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), body);
        if status == StatusCode::UNAUTHORIZED {
            Outcome::Unauthorized(error)
        } else if error.is_retryable() {
            Outcome::Retry {
                delay: self.calculate_backoff(attempt),
                error,
            }
        } else {
            Outcome::Fail(error)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_authenticator", &self.authenticator.is_some())
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
