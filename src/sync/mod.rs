//! Pagination controller
//!
//! Each call fetches exactly one page and returns it with the continuation
//! for the next call. The host re-enters until no continuation comes back.
//!
//! For invoices the page query and the preferences lookup run concurrently;
//! PDF downloads (when requested) fan out once the page is known and are
//! joined before any record is normalized. The first failure aborts the
//! whole page.

mod types;

pub use types::{CustomerSyncParams, InvoiceSyncParams, SyncPage};

use crate::api::QboApi;
use crate::config::ConnectorConfig;
use crate::currency::CurrencyTable;
use crate::error::Result;
use crate::host::SyncContext;
use crate::normalize::{normalize_customer, normalize_invoice, Customer, Invoice, RawCustomer, RawInvoice};
use crate::pagination::StartPositionPaginator;
use crate::query::{build_query, date_predicate, ACTIVE_ONLY_PREDICATE};
use crate::types::Entity;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// QuickBooks Online Customer/Invoice connector
#[derive(Debug, Clone)]
pub struct QboConnector {
    config: ConnectorConfig,
    currencies: Arc<CurrencyTable>,
}

impl QboConnector {
    /// Connector using the built-in currency table
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            config,
            currencies: CurrencyTable::builtin(),
        }
    }

    /// Replace the currency table used for line summaries
    #[must_use]
    pub fn with_currencies(mut self, currencies: Arc<CurrencyTable>) -> Self {
        self.currencies = currencies;
        self
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    fn api<'a>(&'a self, ctx: &'a SyncContext) -> QboApi<'a> {
        QboApi::new(
            ctx.fetcher.as_ref(),
            self.config.api_base_url(),
            self.config.minor_version,
        )
    }

    /// Fetch one page of customers
    pub async fn sync_customers(
        &self,
        ctx: &SyncContext,
        params: &CustomerSyncParams,
    ) -> Result<SyncPage<Customer>> {
        let paginator = StartPositionPaginator::new(self.config.page_size);
        let start = paginator.start_position(ctx.continuation.as_ref());
        let predicate = params.active_only.then_some(ACTIVE_ONLY_PREDICATE);
        let query = build_query(
            &Entity::Customer.base_select(),
            start,
            predicate,
            paginator.page_size,
        );

        let raw: Vec<RawCustomer> = self
            .api(ctx)
            .query_records(&params.company_id, Entity::Customer, &query)
            .await?;

        let result: Vec<Customer> = raw.iter().map(normalize_customer).collect();
        let continuation = paginator.process_page(start, result.len()).into_continuation();

        info!(
            "Customers page at {start}: {} records, next {:?}",
            result.len(),
            continuation.map(|c| c.start_position)
        );
        Ok(SyncPage {
            result,
            continuation,
        })
    }

    /// Fetch one page of invoices, with PDFs when requested
    pub async fn sync_invoices(
        &self,
        ctx: &SyncContext,
        params: &InvoiceSyncParams,
    ) -> Result<SyncPage<Invoice>> {
        let page_size = if params.include_pdfs {
            self.config.pdf_page_size
        } else {
            self.config.page_size
        };
        let paginator = StartPositionPaginator::new(page_size);
        let start = paginator.start_position(ctx.continuation.as_ref());
        let predicate = date_predicate(params.date_range);
        if params.date_range.is_some() && predicate.is_none() {
            debug!("Ignoring out-of-range date filter {:?}", params.date_range);
        }
        let query = build_query(
            &Entity::Invoice.base_select(),
            start,
            predicate.as_deref(),
            paginator.page_size,
        );

        let api = self.api(ctx);
        let company_id = params.company_id.as_str();
        let (raw, home_currency) = tokio::try_join!(
            api.query_records::<RawInvoice>(company_id, Entity::Invoice, &query),
            api.home_currency(company_id),
        )?;

        let pdfs: Vec<Option<String>> = if params.include_pdfs {
            let downloads = raw.iter().map(|invoice| {
                let invoice_id = invoice.id.as_str();
                async move {
                    api.invoice_pdf(ctx.blob_storage.as_ref(), company_id, invoice_id)
                        .await
                        .map(Some)
                }
            });
            try_join_all(downloads).await?
        } else {
            vec![None; raw.len()]
        };

        let result: Vec<Invoice> = raw
            .iter()
            .zip(pdfs)
            .map(|(invoice, pdf)| {
                normalize_invoice(invoice, &home_currency, &self.currencies, pdf)
            })
            .collect();
        let continuation = paginator.process_page(start, result.len()).into_continuation();

        info!(
            "Invoices page at {start}: {} records (home currency {home_currency}), next {:?}",
            result.len(),
            continuation.map(|c| c.start_position)
        );
        Ok(SyncPage {
            result,
            continuation,
        })
    }
}
