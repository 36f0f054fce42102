//! Sync invocation inputs and outputs

use crate::pagination::Continuation;
use crate::query::DateRange;
use serde::Serialize;

/// Filters for the Customers table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSyncParams {
    /// QBO company (realm) id
    pub company_id: String,
    /// Only return active customers
    pub active_only: bool,
}

impl CustomerSyncParams {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            active_only: false,
        }
    }

    #[must_use]
    pub fn active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }
}

/// Filters for the Invoices table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSyncParams {
    /// QBO company (realm) id
    pub company_id: String,
    /// Transaction date range; ignored when out of provider bounds
    pub date_range: Option<DateRange>,
    /// Download and attach one PDF per invoice
    pub include_pdfs: bool,
}

impl InvoiceSyncParams {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            date_range: None,
            include_pdfs: false,
        }
    }

    #[must_use]
    pub fn date_range(mut self, range: Option<DateRange>) -> Self {
        self.date_range = range;
        self
    }

    #[must_use]
    pub fn include_pdfs(mut self, include: bool) -> Self {
        self.include_pdfs = include;
        self
    }
}

/// One page of normalized records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncPage<T> {
    pub result: Vec<T>,
    /// `None` once the stream is exhausted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Continuation>,
}

impl<T> SyncPage<T> {
    pub fn is_last(&self) -> bool {
        self.continuation.is_none()
    }
}
