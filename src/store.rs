//! Label record store abstraction.
//!
//! The resolver only needs one query from a store: every record of one
//! language whose scope is a base scope or one of its child sections.

pub mod memory;

use std::future::Future;

use thiserror::Error;

use crate::input::record::LabelRecord;
use crate::types::ScopeKey;

pub use memory::MemoryStore;

/// Infrastructure failure of a record store.
///
/// Distinct from "no records found", which is never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store failed to respond
    #[error("Label record store is unavailable: {0}")]
    Unavailable(String),
    /// The query did not complete within the configured timeout
    #[error("Label record query timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },
}

/// A queryable collection of flat label records.
pub trait LabelRecordStore: Send + Sync {
    /// Returns every `language` record whose scope is `scope` or a child of it.
    ///
    /// Records are returned in a stable order so bundle construction is
    /// reproducible.
    fn query(
        &self,
        scope: &ScopeKey,
        language: &str,
    ) -> impl Future<Output = Result<Vec<LabelRecord>, StoreError>> + Send;

    /// Write counter, bumped whenever the store contents change.
    fn generation(&self) -> u64 {
        0
    }
}
