//! Shared vocabulary: API environments, synced entities, retry backoff

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Environment
// ============================================================================

/// Production API base URL
pub const PRODUCTION_BASE_URL: &str = "https://quickbooks.api.intuit.com/v3/company";

/// Sandbox API base URL
pub const SANDBOX_BASE_URL: &str = "https://sandbox-quickbooks.api.intuit.com/v3/company";

/// QuickBooks Online environment a company lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Live companies
    #[default]
    Production,
    /// Developer sandbox companies
    Sandbox,
}

impl Environment {
    /// Base URL of the accounting API for this environment
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

// ============================================================================
// Entity
// ============================================================================

/// QBO entities this crate can sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    Customer,
    Invoice,
}

impl Entity {
    /// Entity name as used in queries and in the `QueryResponse` body
    pub fn name(self) -> &'static str {
        match self {
            Entity::Customer => "Customer",
            Entity::Invoice => "Invoice",
        }
    }

    /// `select * from {Entity}` base query
    pub fn base_select(self) -> String {
        format!("select * from {}", self.name())
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Growth of the delay between transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    Constant,
    Linear,
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// QBO sends `""` for cleared text fields; treat it as absent
pub trait OptionStringExt {
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        Some(self).none_if_empty()
    }
}
