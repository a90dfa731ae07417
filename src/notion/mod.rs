//! Remote document source.
//!
//! This module owns everything that talks HTTP:
//! - `NotionClient` (authenticated, version-pinned REST client)
//! - `RetryPolicy` (capped exponential backoff for transient failures)
//! - `TreeLoader` (recursive block tree assembly with guards)
//! - wire types and tolerant payload decoding

pub mod client;
pub mod retry;
pub mod tree;
pub mod wire;

pub use client::NotionClient;
pub use retry::RetryPolicy;
pub use tree::{TreeLimits, TreeLoader};
pub use wire::{ChildrenPage, FetchedBlock};

use crate::error::Result;
use crate::model::DocumentRecord;

/// Read-only source of documents and their block trees.
///
/// Implemented by `NotionClient`; the sync engine and the tree loader
/// only ever see this boundary, so tests drive them with in-memory
/// sources.
pub trait DocumentSource: Send + Sync {
    /// List every document in the collection, following pagination to
    /// the end. No server-side eligibility filter is applied: deletion
    /// detection needs the complete view.
    fn list_documents(&self) -> impl std::future::Future<Output = Result<Vec<DocumentRecord>>> + Send;

    /// One page of children for a block or document.
    fn block_children(
        &self,
        parent_id: &str,
        cursor: Option<&str>,
    ) -> impl std::future::Future<Output = Result<ChildrenPage>> + Send;
}
