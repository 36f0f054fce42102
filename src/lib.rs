#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

//! # qbo-sync
//!
//! Paginated, normalized Customer and Invoice streams from QuickBooks Online.
//!
//! The connector is driven by a host. Each sync call fetches exactly one
//! page, normalizes it and hands back a continuation; the host stores the
//! continuation and calls again until none is returned.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qbo_sync::{
//!     AuthConfig, ConnectorConfig, CustomerSyncParams, HttpFetcher,
//!     ObjectStoreBlobStorage, QboConnector, SyncContext,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> qbo_sync::Result<()> {
//!     let config = ConnectorConfig::default();
//!     let fetcher = HttpFetcher::from_config(&config, AuthConfig::Bearer { token: "...".into() })?;
//!     let connector = QboConnector::new(config);
//!     let params = CustomerSyncParams::new("123146096291789").active_only(true);
//!
//!     let mut ctx = SyncContext::new(Arc::new(fetcher), Arc::new(ObjectStoreBlobStorage::in_memory()));
//!     loop {
//!         let page = connector.sync_customers(&ctx, &params).await?;
//!         // Process page.result
//!         match page.continuation {
//!             Some(next) => ctx = ctx.with_continuation(Some(next)),
//!             None => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Host                                 │
//! │   SyncContext { fetcher, blob_storage, continuation }           │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────────┐
//! │              QboConnector::sync_customers / sync_invoices       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬──────────────┬───┴──────────┬───────────┬───────────┐
//! │  Query    │  Paginate    │  API         │ Normalize │ Currency  │
//! ├───────────┼──────────────┼──────────────┼───────────┼───────────┤
//! │ WHERE     │ startPosition│ query        │ Customer  │ Symbols   │
//! │ Dates     │ Full page?   │ Preferences  │ Invoice   │ Decimals  │
//! │ Active    │              │ Invoice PDF  │ LineItem  │           │
//! └───────────┴──────────────┴──────────────┴───────────┴───────────┘
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Connector configuration
pub mod config;

/// OAuth2 authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Host capabilities: fetcher and blob storage
pub mod host;

/// Currency symbols and amount formatting
pub mod currency;

/// QBO query string construction
pub mod query;

/// QBO Accounting API endpoints
pub mod api;

/// Raw QBO entities and their normalized forms
pub mod normalize;

/// Continuation and page-state handling
pub mod pagination;

/// Per-entity sync operations
pub mod sync;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use auth::AuthConfig;
pub use config::ConnectorConfig;
pub use host::{BlobStorage, Fetcher, HttpFetcher, ObjectStoreBlobStorage, SyncContext};
pub use normalize::{Customer, Invoice};
pub use pagination::Continuation;
pub use query::DateRange;
pub use sync::{CustomerSyncParams, InvoiceSyncParams, QboConnector, SyncPage};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
