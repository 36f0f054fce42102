//! Authentication module
//!
//! Supports: Bearer tokens handed over by the host, and the Intuit OAuth2
//! refresh flow (with refresh-token rotation).
//!
//! The authorization-code handshake itself happens outside this crate;
//! [`authorization_url`] only builds the consent URL that starts it.

mod authenticator;
mod types;

pub use authenticator::{authorization_url, Authenticator};
pub use types::{AuthConfig, CachedToken, ACCOUNTING_SCOPE, AUTHORIZATION_URL, TOKEN_URL};

#[cfg(test)]
mod tests;
