//! Connector configuration
//!
//! Process-wide settings fixed at startup: which environment to talk to,
//! the API version pin, page sizes and transport tuning. Loaded from YAML
//! (every field optional) or taken from `Default`.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::Environment;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Hard cap the provider places on `maxresults`
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Default page size for pages that need no per-record follow-up requests
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Default page size for invoice pages that also download one PDF per record
pub const DEFAULT_PDF_PAGE_SIZE: u32 = 20;

/// Default `minorversion` query parameter
pub const DEFAULT_MINOR_VERSION: u32 = 75;

// ============================================================================
// Connector Config
// ============================================================================

/// Complete connector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Production or sandbox
    #[serde(default)]
    pub environment: Environment,

    /// Override for the API base URL (proxies, tests)
    #[serde(default)]
    pub base_url: Option<String>,

    /// API minor version pin
    #[serde(default = "default_minor_version")]
    pub minor_version: u32,

    /// Records per page for Customer pages and Invoice pages without PDFs
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Records per page for Invoice pages that include PDFs
    #[serde(default = "default_pdf_page_size")]
    pub pdf_page_size: u32,

    /// Transport tuning
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_minor_version() -> u32 {
    DEFAULT_MINOR_VERSION
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_pdf_page_size() -> u32 {
    DEFAULT_PDF_PAGE_SIZE
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            minor_version: DEFAULT_MINOR_VERSION,
            page_size: DEFAULT_PAGE_SIZE,
            pdf_page_size: DEFAULT_PDF_PAGE_SIZE,
            http: HttpConfig::default(),
        }
    }
}

impl ConnectorConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Point the connector at a different base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the default page size
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page size used when PDFs are requested
    #[must_use]
    pub fn with_pdf_page_size(mut self, size: u32) -> Self {
        self.pdf_page_size = size;
        self
    }

    /// Check page sizes and the version pin
    pub fn validate(&self) -> Result<()> {
        validate_page_size("page_size", self.page_size)?;
        validate_page_size("pdf_page_size", self.pdf_page_size)?;
        if self.minor_version == 0 {
            return Err(Error::invalid_value("minor_version", "must be positive"));
        }
        if let Some(url) = &self.base_url {
            url::Url::parse(url)?;
        }
        Ok(())
    }

    /// Effective API base URL, without trailing slash
    pub fn api_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }
}

fn validate_page_size(field: &str, size: u32) -> Result<()> {
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(Error::invalid_value(
            field,
            format!("must be between 1 and {MAX_PAGE_SIZE}, got {size}"),
        ));
    }
    Ok(())
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Client-side throttle; QBO allows 500 requests per minute per company
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_requests_per_minute() -> u32 {
    450
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

impl HttpConfig {
    /// Build the transport configuration
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries);
        builder = if self.requests_per_minute == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::per_minute(self.requests_per_minute))
        };
        builder.build()
    }
}
