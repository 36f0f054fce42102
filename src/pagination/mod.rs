//! Pagination module
//!
//! # Overview
//!
//! One invocation fetches one page. The host carries a [`Continuation`]
//! between invocations; [`PageState`] is the state machine behind it and
//! [`StartPositionPaginator`] applies it to the QBO query endpoint.

mod strategies;
mod types;

pub use strategies::StartPositionPaginator;
pub use types::{Continuation, NextPage, PageState};
