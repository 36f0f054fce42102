//! Pagination types
//!
//! The continuation is the only state that survives between page
//! invocations. The host owns it; the core reads it and hands back a
//! fresh one.

use serde::{Deserialize, Serialize};

/// Cursor carried by the host between page invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Continuation {
    /// 1-based offset into the remote result set
    #[serde(default = "first_position")]
    pub start_position: u32,
}

fn first_position() -> u32 {
    1
}

impl Continuation {
    /// Continuation pointing at `start_position` (clamped to at least 1)
    pub fn at(start_position: u32) -> Self {
        Self {
            start_position: start_position.max(1),
        }
    }
}

impl Default for Continuation {
    fn default() -> Self {
        Self::at(first_position())
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// A full page came back; more records may follow
    Continue(Continuation),
    /// Short page; the stream is finished
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }

    /// The continuation to hand back to the host, if any
    pub fn into_continuation(self) -> Option<Continuation> {
        match self {
            Self::Continue(continuation) => Some(continuation),
            Self::Done => None,
        }
    }
}

/// Where a paged sync stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// No continuation yet
    AwaitingFirstPage,
    /// Previous page was full
    AwaitingNextPage { start_position: u32 },
    /// Previous page was short (or empty)
    Exhausted,
}

impl PageState {
    /// State implied by the continuation the host passed in
    pub fn from_continuation(continuation: Option<&Continuation>) -> Self {
        match continuation {
            None => Self::AwaitingFirstPage,
            Some(c) => Self::AwaitingNextPage {
                start_position: c.start_position.max(1),
            },
        }
    }

    /// Start position of the page to fetch; `None` once exhausted
    pub fn start_position(&self) -> Option<u32> {
        match self {
            Self::AwaitingFirstPage => Some(first_position()),
            Self::AwaitingNextPage { start_position } => Some(*start_position),
            Self::Exhausted => None,
        }
    }

    /// Transition after a page of `records` was fetched with `page_size`
    pub fn after_page(self, page_size: u32, records: usize) -> Self {
        let Some(start) = self.start_position() else {
            return Self::Exhausted;
        };
        if records < page_size as usize {
            return Self::Exhausted;
        }
        Self::AwaitingNextPage {
            start_position: start.saturating_add(page_size),
        }
    }

    /// Check if no further page should be requested
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// The continuation representing this state
    pub fn continuation(&self) -> Option<Continuation> {
        match self {
            Self::AwaitingFirstPage => Some(Continuation::default()),
            Self::AwaitingNextPage { start_position } => Some(Continuation::at(*start_position)),
            Self::Exhausted => None,
        }
    }
}
