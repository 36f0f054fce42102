//! QuickBooks Online API access
//!
//! Query endpoint, ancillary endpoints (company preferences) and invoice
//! PDF retrieval, all through the host's [`crate::host::Fetcher`].

mod client;

pub use client::{home_currency_of, QboApi, FALLBACK_HOME_CURRENCY, PDF_CONTENT_TYPE};
