//! HTTP transport
//!
//! Backs [`crate::host::HttpFetcher`]. Retries 429/5xx/timeouts with
//! backoff, throttles under the QBO per-company limit, and applies
//! credentials from [`crate::auth`].

mod client;
mod rate_limit;

pub use client::{Backoff, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
