//! Host capabilities
//!
//! Everything the sync core needs from its surroundings arrives through a
//! [`SyncContext`] passed by parameter: an authenticated [`Fetcher`], a
//! transient [`BlobStorage`] and the continuation of the previous call.

mod blob;
mod fetcher;

pub use blob::{BlobStorage, ObjectStoreBlobStorage};
pub use fetcher::{FetchRequest, FetchResponse, Fetcher, HttpFetcher, ResponseKind};

use crate::pagination::Continuation;
use std::sync::Arc;

/// Capability bundle for one sync invocation
#[derive(Clone)]
pub struct SyncContext {
    /// Authenticated GET capability
    pub fetcher: Arc<dyn Fetcher>,
    /// Storage for binary attachments
    pub blob_storage: Arc<dyn BlobStorage>,
    /// Continuation returned by the previous invocation, if any
    pub continuation: Option<Continuation>,
}

impl SyncContext {
    /// Context for a first page
    pub fn new(fetcher: Arc<dyn Fetcher>, blob_storage: Arc<dyn BlobStorage>) -> Self {
        Self {
            fetcher,
            blob_storage,
            continuation: None,
        }
    }

    /// Same capabilities, different continuation
    #[must_use]
    pub fn with_continuation(mut self, continuation: Option<Continuation>) -> Self {
        self.continuation = continuation;
        self
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("continuation", &self.continuation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod fakes;
