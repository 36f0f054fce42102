//! Query builder
//!
//! Emits `{base}[ where {predicate}] startposition {n} maxresults {m}`.
//!
//! Predicates are inserted verbatim. Nothing is escaped, so a predicate
//! built from user data must already be valid provider syntax.

use crate::config::MAX_PAGE_SIZE;
use chrono::{Datelike, NaiveDate};

/// Earliest year the provider accepts in a date filter
pub const MIN_FILTER_YEAR: i32 = 1900;

/// Latest year the provider accepts in a date filter
pub const MAX_FILTER_YEAR: i32 = 2100;

/// Predicate restricting customers to active ones
pub const ACTIVE_ONLY_PREDICATE: &str = "Active = true";

/// Build a paged query string
pub fn build_query(
    base_select: &str,
    start_position: u32,
    predicate: Option<&str>,
    max_results: u32,
) -> String {
    let mut query = base_select.trim().to_string();

    if let Some(predicate) = predicate.and_then(strip_where) {
        query.push_str(" where ");
        query.push_str(predicate);
    }

    query.push_str(&format!(
        " startposition {} maxresults {}",
        start_position.max(1),
        max_results.clamp(1, MAX_PAGE_SIZE)
    ));
    query
}

/// Drop a leading `where` keyword; `None` if nothing is left
fn strip_where(predicate: &str) -> Option<&str> {
    let trimmed = predicate.trim();
    let rest = match trimmed.get(..5) {
        Some(head) if head.eq_ignore_ascii_case("where") => {
            let rest = &trimmed[5..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    };
    (!rest.is_empty()).then_some(rest)
}

/// Inclusive transaction date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The range, if both ends fall within years the provider accepts
    pub fn valid(self) -> Option<Self> {
        let sane = |d: NaiveDate| (MIN_FILTER_YEAR..=MAX_FILTER_YEAR).contains(&d.year());
        (sane(self.start) && sane(self.end)).then_some(self)
    }

    /// `TxnDate` predicate for this range
    pub fn predicate(&self) -> String {
        format!(
            "TxnDate >= '{}' and TxnDate <= '{}'",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Date predicate for an optional caller range; out-of-bounds ranges count as absent
pub fn date_predicate(range: Option<DateRange>) -> Option<String> {
    range.and_then(DateRange::valid).map(|r| r.predicate())
}
