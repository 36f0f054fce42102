//! Customer mapping

use super::raw::{RawCustomer, RawRef};
use super::types::{Address, Customer, CustomerReference};
use super::{parse_timestamp, ref_value};
use crate::types::OptionStringExt;

/// Map a provider customer to the normalized shape
pub fn normalize_customer(raw: &RawCustomer) -> Customer {
    let meta = raw.meta_data.as_ref();

    Customer {
        customer_id: raw.id.clone(),
        display_name: raw.display_name.clone().none_if_empty(),
        company_name: raw.company_name.clone().none_if_empty(),
        first_name: raw.given_name.clone().none_if_empty(),
        last_name: raw.family_name.clone().none_if_empty(),
        print_on_check_name: raw.print_on_check_name.clone().none_if_empty(),
        balance: raw.balance,
        active: raw.active,
        taxable: raw.taxable,
        is_project: raw.is_project,
        is_job: raw.job,
        bill_with_parent: raw.bill_with_parent,
        preferred_delivery_method: raw.preferred_delivery_method.clone().none_if_empty(),
        currency: ref_value(raw.currency_ref.as_ref()),
        payment_method: ref_value(raw.payment_method_ref.as_ref()),
        email: raw
            .primary_email_addr
            .as_ref()
            .and_then(|e| e.address.clone().none_if_empty()),
        phone: raw
            .primary_phone
            .as_ref()
            .and_then(|p| p.free_form_number.clone().none_if_empty()),
        billing_address: raw.bill_addr.as_ref().map(Address::from_raw),
        shipping_address: raw.ship_addr.as_ref().map(Address::from_raw),
        parent_customer: raw.parent_ref.as_ref().and_then(parent_reference),
        created_at: meta.and_then(|m| parse_timestamp(m.create_time.as_deref())),
        modified_at: meta.and_then(|m| parse_timestamp(m.last_updated_time.as_deref())),
    }
}

/// The parent's name is not part of the child's record, so it stays a placeholder
fn parent_reference(parent: &RawRef) -> Option<CustomerReference> {
    ref_value(Some(parent)).map(CustomerReference::unresolved)
}
