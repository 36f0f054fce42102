//! Invoice mapping
//!
//! The currency is resolved once per invoice, before any line summary is
//! formatted, because every summary embeds its symbol and precision.

use super::raw::{RawInvoice, RawLine};
use super::types::{Address, CustomerReference, Invoice, ItemReference, LineItem};
use super::{parse_date, parse_timestamp, ref_value};
use crate::currency::{format_amount, Currency, CurrencyTable};
use crate::types::OptionStringExt;

/// Provider classification of an invoice line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineDetailType {
    SalesItem,
    SubTotal,
    Discount,
    Group,
    DescriptionOnly,
    Other(String),
}

impl LineDetailType {
    pub fn parse(detail_type: Option<&str>) -> Self {
        match detail_type.unwrap_or_default() {
            "SalesItemLineDetail" => Self::SalesItem,
            "SubTotalLineDetail" => Self::SubTotal,
            "DiscountLineDetail" => Self::Discount,
            "GroupLineDetail" => Self::Group,
            "DescriptionOnly" => Self::DescriptionOnly,
            other => Self::Other(other.to_string()),
        }
    }
}

impl RawLine {
    fn detail(&self) -> LineDetailType {
        LineDetailType::parse(self.detail_type.as_deref())
    }
}

/// Invoice currency code if set, otherwise the company's home currency
pub fn effective_currency(raw: &RawInvoice, home_currency: &str) -> String {
    ref_value(raw.currency_ref.as_ref()).unwrap_or_else(|| home_currency.to_string())
}

/// `total > 0 && balance == 0`
pub fn is_paid(total: Option<f64>, balance: Option<f64>) -> bool {
    total.is_some_and(|t| t > 0.0) && balance == Some(0.0)
}

/// Sum of all subtotal lines; `None` when the invoice has no line array
pub fn subtotal(lines: Option<&[RawLine]>) -> Option<f64> {
    lines.map(|lines| {
        lines
            .iter()
            .filter(|line| line.detail() == LineDetailType::SubTotal)
            .map(|line| line.amount.unwrap_or(0.0))
            .sum()
    })
}

/// Map a provider invoice to the normalized shape
///
/// `home_currency` is the company default; `pdf` the stored attachment
/// URL when PDFs were requested for this page.
pub fn normalize_invoice(
    raw: &RawInvoice,
    home_currency: &str,
    currencies: &CurrencyTable,
    pdf: Option<String>,
) -> Invoice {
    let currency_code = effective_currency(raw, home_currency);
    let currency = currencies.get(&currency_code);
    let meta = raw.meta_data.as_ref();
    let lines = raw.line.as_deref();

    Invoice {
        invoice_id: raw.id.clone(),
        invoice_number: raw.doc_number.clone().none_if_empty(),
        invoice_date: parse_date(raw.txn_date.as_deref()),
        due_date: parse_date(raw.due_date.as_deref()),
        customer: raw.customer_ref.as_ref().and_then(|c| {
            ref_value(Some(c))
                .map(|id| CustomerReference::resolved(id, c.name.clone().none_if_empty()))
        }),
        currency: currency_code,
        total_amount: raw.total_amt,
        balance: raw.balance,
        deposit_amount: raw.deposit,
        subtotal: subtotal(lines),
        tax: raw.txn_tax_detail.as_ref().and_then(|t| t.total_tax),
        paid: is_paid(raw.total_amt, raw.balance),
        line_items: lines
            .unwrap_or_default()
            .iter()
            .filter(|line| line.detail() == LineDetailType::SalesItem)
            .map(|line| line_item(line, currency))
            .collect(),
        pdf,
        billing_email: raw
            .bill_email
            .as_ref()
            .and_then(|e| e.address.clone().none_if_empty()),
        billing_address: raw.bill_addr.as_ref().map(Address::from_raw),
        shipping_address: raw.ship_addr.as_ref().map(Address::from_raw),
        customer_memo: raw
            .customer_memo
            .as_ref()
            .and_then(|m| m.value.clone().none_if_empty()),
        sales_terms: ref_value(raw.sales_term_ref.as_ref()),
        print_status: raw.print_status.clone().none_if_empty(),
        email_status: raw.email_status.clone().none_if_empty(),
        created_at: meta.and_then(|m| parse_timestamp(m.create_time.as_deref())),
        modified_at: meta.and_then(|m| parse_timestamp(m.last_updated_time.as_deref())),
    }
}

fn line_item(line: &RawLine, currency: Option<&Currency>) -> LineItem {
    let detail = line.sales_item_line_detail.as_ref();
    let quantity = detail.and_then(|d| d.qty);
    let description = line.description.clone().none_if_empty();

    LineItem {
        line_item_id: line.id.clone().none_if_empty(),
        line_number: line.line_num,
        summary: line_summary(
            quantity,
            description.as_deref(),
            line.amount.unwrap_or(0.0),
            currency,
        ),
        description,
        quantity,
        unit_price: detail.and_then(|d| d.unit_price),
        amount: line.amount,
        item: detail.and_then(|d| d.item_ref.as_ref()).map(|item| ItemReference {
            item_id: item.value.clone().none_if_empty(),
            name: item.name.clone().none_if_empty(),
        }),
        tax_code: detail.and_then(|d| ref_value(d.tax_code_ref.as_ref())),
    }
}

/// `"{qty}x {description}: {symbol}{amount}"`; the quantity prefix is dropped when unknown
pub fn line_summary(
    quantity: Option<f64>,
    description: Option<&str>,
    amount: f64,
    currency: Option<&Currency>,
) -> String {
    let amount = format_amount(currency, amount);
    let description = description.unwrap_or_default();
    match quantity {
        Some(qty) => format!("{qty}x {description}: {amount}"),
        None => format!("{description}: {amount}"),
    }
}
