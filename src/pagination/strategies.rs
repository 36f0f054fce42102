//! Pagination strategy for the QBO query endpoint

use super::types::{Continuation, NextPage, PageState};
use crate::config::MAX_PAGE_SIZE;

/// Start-position pagination (`startposition N maxresults M`)
///
/// The provider reports no total count, so a full page is the only signal
/// that more records may exist. A page shorter than `page_size` ends the
/// stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartPositionPaginator {
    /// Number of records per page
    pub page_size: u32,
}

impl StartPositionPaginator {
    /// Create a paginator; the page size is clamped to 1..=1000
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Start position for the page described by `continuation`
    pub fn start_position(&self, continuation: Option<&Continuation>) -> u32 {
        PageState::from_continuation(continuation)
            .start_position()
            .unwrap_or(1)
    }

    /// Decide whether another page follows a page fetched at `start`
    pub fn process_page(&self, start: u32, records_count: usize) -> NextPage {
        let state = PageState::AwaitingNextPage {
            start_position: start.max(1),
        }
        .after_page(self.page_size, records_count);

        match state.continuation() {
            Some(continuation) if !state.is_exhausted() => NextPage::Continue(continuation),
            _ => NextPage::Done,
        }
    }
}
