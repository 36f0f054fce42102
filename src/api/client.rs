//! QBO API client
//!
//! Thin layer over the injected [`Fetcher`]. It knows the URL scheme of
//! the accounting API and where the interesting part of each body lives,
//! nothing else. No caching, no retries.

use crate::error::{Error, Result};
use crate::host::{BlobStorage, FetchRequest, Fetcher};
use crate::types::{Entity, JsonValue};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Home currency assumed when the company preferences carry none
pub const FALLBACK_HOME_CURRENCY: &str = "USD";

const HOME_CURRENCY_POINTER: &str = "/Preferences/CurrencyPrefs/HomeCurrency/value";

/// MIME type of invoice PDFs
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Client for one API base URL
#[derive(Clone, Copy)]
pub struct QboApi<'a> {
    fetcher: &'a dyn Fetcher,
    base_url: &'a str,
    minor_version: u32,
}

impl<'a> QboApi<'a> {
    /// `base_url` is the `.../v3/company` prefix, without trailing slash
    pub fn new(fetcher: &'a dyn Fetcher, base_url: &'a str, minor_version: u32) -> Self {
        Self {
            fetcher,
            base_url,
            minor_version,
        }
    }

    fn company_url(&self, company_id: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            company_id,
            path.trim_start_matches('/')
        )
    }

    /// Run a query and return the `QueryResponse` object
    ///
    /// An empty result set comes back as `QueryResponse: {}`; a body with
    /// no `QueryResponse` at all is treated the same way.
    pub async fn query(&self, company_id: &str, query: &str) -> Result<JsonValue> {
        debug!("QBO query for company {company_id}: {query}");
        let request = FetchRequest::json(self.company_url(company_id, "query"))
            .query("minorversion", self.minor_version.to_string())
            .query("query", query);

        let mut body = self.fetcher.fetch(request).await?.into_json()?;
        Ok(body
            .get_mut("QueryResponse")
            .map(JsonValue::take)
            .unwrap_or_else(|| JsonValue::Object(Default::default())))
    }

    /// Run a query and decode the entity array of the result
    pub async fn query_records<T: DeserializeOwned>(
        &self,
        company_id: &str,
        entity: Entity,
        query: &str,
    ) -> Result<Vec<T>> {
        let mut response = self.query(company_id, query).await?;
        decode_records(entity, response.get_mut(entity.name()).map(JsonValue::take))
    }

    /// GET an arbitrary company endpoint (e.g. `preferences`) and return the whole body
    pub async fn get_endpoint(&self, company_id: &str, path: &str) -> Result<JsonValue> {
        let request = FetchRequest::json(self.company_url(company_id, path))
            .query("minorversion", self.minor_version.to_string());
        self.fetcher.fetch(request).await?.into_json()
    }

    /// Company home currency from the preferences endpoint, `USD` if unset
    pub async fn home_currency(&self, company_id: &str) -> Result<String> {
        let preferences = self.get_endpoint(company_id, "preferences").await?;
        Ok(home_currency_of(&preferences))
    }

    /// Download an invoice PDF into `blob_storage` and return its temporary URL
    pub async fn invoice_pdf(
        &self,
        blob_storage: &dyn BlobStorage,
        company_id: &str,
        invoice_id: &str,
    ) -> Result<String> {
        let path = format!("invoice/{invoice_id}/pdf");
        let request = FetchRequest::binary(self.company_url(company_id, &path), PDF_CONTENT_TYPE)
            .query("minorversion", self.minor_version.to_string());

        let pdf = self.fetcher.fetch(request).await?.into_bytes()?;
        debug!("Fetched {} byte PDF for invoice {invoice_id}", pdf.len());
        blob_storage.store_blob(pdf, PDF_CONTENT_TYPE).await
    }
}

impl std::fmt::Debug for QboApi<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QboApi")
            .field("base_url", &self.base_url)
            .field("minor_version", &self.minor_version)
            .finish_non_exhaustive()
    }
}

/// Home currency code in a preferences body
pub fn home_currency_of(preferences: &JsonValue) -> String {
    preferences
        .pointer(HOME_CURRENCY_POINTER)
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(FALLBACK_HOME_CURRENCY)
        .to_string()
}

/// Decode the entity array of a `QueryResponse`; absent means empty
fn decode_records<T: DeserializeOwned>(entity: Entity, records: Option<JsonValue>) -> Result<Vec<T>> {
    match records {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item)
                    .map_err(|e| Error::record_decode(entity.name(), e.to_string()))
            })
            .collect(),
        Some(other) => Err(Error::record_decode(
            entity.name(),
            format!("expected an array, got {other}"),
        )),
    }
}
