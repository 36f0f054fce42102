//! ISO 4217 currency reference data
//!
//! Only used for formatting line-item summaries. The built-in table is
//! parsed from the bundled `currencies.json` once per process and never
//! mutated.

use crate::error::Result;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Decimal places used when a currency cannot be resolved
pub const DEFAULT_DECIMALS: u8 = 2;

/// Formatting data for one currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    /// ISO 4217 code
    pub code: String,
    /// Display symbol
    pub symbol: String,
    /// Minor unit digits
    pub decimals: u8,
}

impl Currency {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// ISO 4217 table keyed by code: `{"USD": {"name", "symbol", "decimals"}}`
const BUILTIN_CURRENCIES: &str = include_str!("currencies.json");

#[derive(Debug, Deserialize)]
struct CurrencyEntry {
    symbol: String,
    decimals: u8,
}

static BUILTIN: Lazy<Arc<CurrencyTable>> = Lazy::new(|| {
    let table = CurrencyTable::from_json(BUILTIN_CURRENCIES).unwrap_or_else(|e| {
        warn!("Built-in currency table is unreadable, amounts format without symbols: {e}");
        CurrencyTable::default()
    });
    Arc::new(table)
});

/// Immutable code -> currency lookup
#[derive(Debug, Clone, Default)]
pub struct CurrencyTable {
    by_code: HashMap<String, Currency>,
}

impl CurrencyTable {
    /// Shared built-in table
    pub fn builtin() -> Arc<CurrencyTable> {
        Arc::clone(&BUILTIN)
    }

    /// Table holding exactly `entries`
    pub fn from_entries(entries: impl IntoIterator<Item = Currency>) -> Self {
        let by_code = entries
            .into_iter()
            .map(|c| (c.code.to_ascii_uppercase(), c))
            .collect();
        Self { by_code }
    }

    /// Table from a JSON object keyed by currency code
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, CurrencyEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries.into_iter().map(
            |(code, CurrencyEntry { symbol, decimals })| Currency::new(code, symbol, decimals),
        )))
    }

    /// Look up a currency by code (case-insensitive)
    pub fn get(&self, code: &str) -> Option<&Currency> {
        self.by_code.get(&code.trim().to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// `{symbol}{amount}` with the currency's minor digits
///
/// An unresolved currency formats with no symbol and two decimals.
pub fn format_amount(currency: Option<&Currency>, amount: f64) -> String {
    let (symbol, decimals) = match currency {
        Some(c) => (c.symbol.as_str(), c.decimals),
        None => ("", DEFAULT_DECIMALS),
    };
    format!("{symbol}{amount:.prec$}", prec = decimals as usize)
}
