//! HTTP fetch capability
//!
//! The sync core never talks to `reqwest` directly. It describes what it
//! wants as a [`FetchRequest`] and lets the injected [`Fetcher`] decide
//! how (auth, retries, throttling).

use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::JsonValue;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

/// How the body of a response must be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    /// Decode as JSON
    #[default]
    Json,
    /// Keep as opaque bytes, never parsed as text
    Binary,
}

/// A GET request issued by the sync core
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL
    pub url: String,
    /// Query string parameters
    pub query: Vec<(String, String)>,
    /// Extra headers
    pub headers: Vec<(String, String)>,
    /// Body handling hint
    pub kind: ResponseKind,
}

impl FetchRequest {
    /// JSON request (`Accept: application/json`)
    pub fn json(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            kind: ResponseKind::Json,
        }
    }

    /// Binary request with the given `Accept` type
    pub fn binary(url: impl Into<String>, accept: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: vec![("Accept".to_string(), accept.into())],
            kind: ResponseKind::Binary,
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Value of a query parameter, if set
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResponse {
    Json(JsonValue),
    Binary(Bytes),
}

impl FetchResponse {
    /// Take the JSON body, failing on a binary one
    pub fn into_json(self) -> Result<JsonValue> {
        match self {
            FetchResponse::Json(value) => Ok(value),
            FetchResponse::Binary(_) => Err(Error::UnexpectedBody { expected: "JSON" }),
        }
    }

    /// Take the binary body, failing on a JSON one
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            FetchResponse::Binary(bytes) => Ok(bytes),
            FetchResponse::Json(_) => Err(Error::UnexpectedBody { expected: "binary" }),
        }
    }
}

/// Authenticated GET capability supplied by the host
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Perform one request; failures are returned as-is
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

/// [`Fetcher`] backed by the crate's [`HttpClient`]
#[derive(Debug)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    /// Wrap an existing client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Build a client from connector settings and credentials
    pub fn from_config(config: &ConnectorConfig, auth: crate::auth::AuthConfig) -> Result<Self> {
        let client = HttpClient::with_auth(config.http.to_client_config(), auth)?;
        Ok(Self::new(client))
    }

    /// The underlying transport
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let config = RequestConfig {
            query: request.query,
            headers: request.headers,
            ..RequestConfig::default()
        };

        debug!("GET {} ({:?})", request.url, request.kind);
        match request.kind {
            ResponseKind::Json => {
                let value: JsonValue = self.client.get_json(&request.url, &config).await?;
                Ok(FetchResponse::Json(value))
            }
            ResponseKind::Binary => {
                let bytes = self.client.get_bytes(&request.url, &config).await?;
                Ok(FetchResponse::Binary(bytes))
            }
        }
    }
}
