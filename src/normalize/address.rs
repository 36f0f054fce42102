//! Address formatting

use super::raw::RawAddress;
use super::types::Address;
use crate::types::OptionStringExt;

impl Address {
    /// Normalize a provider address and derive its summary
    pub fn from_raw(raw: &RawAddress) -> Self {
        let clean = |field: &Option<String>| field.clone().none_if_empty();
        let mut address = Self {
            line1: clean(&raw.line1),
            line2: clean(&raw.line2),
            line3: clean(&raw.line3),
            line4: clean(&raw.line4),
            line5: clean(&raw.line5),
            city: clean(&raw.city),
            region: clean(&raw.country_sub_division_code),
            postal_code: clean(&raw.postal_code),
            country: clean(&raw.country),
            summary: String::new(),
        };
        address.summary = address.render_summary();
        address
    }

    /// Lines 1-5, `, city`, `, region`, ` postal`; absent parts are skipped
    fn render_summary(&self) -> String {
        let parts: [(&Option<String>, &str); 8] = [
            (&self.line1, ""),
            (&self.line2, " "),
            (&self.line3, " "),
            (&self.line4, " "),
            (&self.line5, " "),
            (&self.city, ", "),
            (&self.region, ", "),
            (&self.postal_code, " "),
        ];

        let mut summary = String::new();
        for (value, separator) in parts {
            if let Some(value) = value {
                summary.push_str(separator);
                summary.push_str(value);
            }
        }
        summary
    }
}
