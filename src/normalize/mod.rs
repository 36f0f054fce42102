//! Record normalization
//!
//! Pure mapping from provider-shaped records ([`raw`]) to the flat output
//! schema ([`types`]). Missing provider fields are omitted from the output,
//! never turned into errors.

mod address;
mod customer;
mod invoice;
pub mod raw;
mod types;

pub use customer::normalize_customer;
pub use invoice::{
    effective_currency, is_paid, line_summary, normalize_invoice, subtotal, LineDetailType,
};
pub use raw::{RawCustomer, RawInvoice};
pub use types::{
    Address, Customer, CustomerReference, Invoice, ItemReference, LineItem,
    UNRESOLVED_DISPLAY_NAME,
};

use chrono::{DateTime, FixedOffset, NaiveDate};
use raw::RawRef;

/// Non-empty `value` of a reference
fn ref_value(reference: Option<&RawRef>) -> Option<String> {
    reference
        .and_then(|r| r.value.as_deref())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// RFC 3339 timestamp; unparsable values are dropped
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
}

/// `YYYY-MM-DD` date; unparsable values are dropped
fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    value.and_then(|v| NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok())
}
