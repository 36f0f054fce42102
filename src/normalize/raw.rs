//! Provider-shaped records
//!
//! Field names follow the QBO wire format. Everything except the entity
//! id is optional; unknown fields are ignored.

use serde::Deserialize;

/// `{ "value": ..., "name": ... }` reference
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRef {
    pub value: Option<String>,
    pub name: Option<String>,
}

/// `{ "value": ... }` free-text wrapper
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMemo {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawMetaData {
    pub create_time: Option<String>,
    pub last_updated_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawEmail {
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPhone {
    pub free_form_number: Option<String>,
}

/// `BillAddr` / `ShipAddr`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub line4: Option<String>,
    pub line5: Option<String>,
    pub city: Option<String>,
    pub country_sub_division_code: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawCustomer {
    pub id: String,
    pub display_name: Option<String>,
    pub company_name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub print_on_check_name: Option<String>,
    pub balance: Option<f64>,
    pub active: Option<bool>,
    pub taxable: Option<bool>,
    pub is_project: Option<bool>,
    pub job: Option<bool>,
    pub bill_with_parent: Option<bool>,
    pub preferred_delivery_method: Option<String>,
    pub currency_ref: Option<RawRef>,
    pub payment_method_ref: Option<RawRef>,
    pub parent_ref: Option<RawRef>,
    pub primary_email_addr: Option<RawEmail>,
    pub primary_phone: Option<RawPhone>,
    pub bill_addr: Option<RawAddress>,
    pub ship_addr: Option<RawAddress>,
    pub meta_data: Option<RawMetaData>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTxnTaxDetail {
    pub total_tax: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawSalesItemLineDetail {
    pub qty: Option<f64>,
    pub unit_price: Option<f64>,
    pub item_ref: Option<RawRef>,
    pub tax_code_ref: Option<RawRef>,
}

/// One entry of an invoice's `Line` array
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawLine {
    pub id: Option<String>,
    pub line_num: Option<u32>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub detail_type: Option<String>,
    pub sales_item_line_detail: Option<RawSalesItemLineDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawInvoice {
    pub id: String,
    pub doc_number: Option<String>,
    pub txn_date: Option<String>,
    pub due_date: Option<String>,
    pub total_amt: Option<f64>,
    pub balance: Option<f64>,
    pub deposit: Option<f64>,
    pub currency_ref: Option<RawRef>,
    pub customer_ref: Option<RawRef>,
    pub sales_term_ref: Option<RawRef>,
    pub customer_memo: Option<RawMemo>,
    pub bill_email: Option<RawEmail>,
    pub bill_addr: Option<RawAddress>,
    pub ship_addr: Option<RawAddress>,
    pub txn_tax_detail: Option<RawTxnTaxDetail>,
    pub print_status: Option<String>,
    pub email_status: Option<String>,
    pub line: Option<Vec<RawLine>>,
    pub meta_data: Option<RawMetaData>,
}
