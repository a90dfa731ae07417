//! Shared types for sync runs.
//!
//! The end-of-run summary is the contract between the engine and its
//! callers: the CLI prints it, tests assert on it, and scripted consumers
//! read it as JSON.

use serde::Serialize;

use crate::error::Error;
use crate::model::DocumentRecord;

/// End-of-run counters, one per document disposition.
///
/// Every fetched document lands in exactly one of `created`, `updated`,
/// `unchanged`, `skipped`, or `failed`. `deleted` counts tracked files
/// removed for pages that are no longer retained.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunSummary {
    /// New files written.
    pub created: usize,
    /// Existing files rewritten because content or file name changed.
    pub updated: usize,
    /// Files already matching the manifest, left alone.
    pub unchanged: usize,
    /// Fetched documents that were not eligible for publication.
    pub skipped: usize,
    /// Tracked files removed because their page left the retained set.
    pub deleted: usize,
    /// Documents that failed to load, render, or write.
    pub failed: usize,
    /// Details for each failed document, in source id order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<DocumentFailure>,
}

impl RunSummary {
    /// Eligible documents the run tried to publish.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.unchanged + self.failed
    }

    /// All documents seen this run, eligible or not.
    #[must_use]
    pub fn total(&self) -> usize {
        self.processed() + self.skipped
    }

    /// True when the run found nothing to publish, skip, or delete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0 && self.deleted == 0
    }
}

/// One document that could not be synced this run.
///
/// The page's tracked file (if any) stays on disk; a failure is never
/// treated as a deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentFailure {
    /// Source page id.
    pub source_id: String,
    /// Page title at fetch time.
    pub title: String,
    /// Human-readable error message.
    pub error: String,
}

impl DocumentFailure {
    pub(crate) fn new(record: &DocumentRecord, error: &Error) -> Self {
        Self {
            source_id: record.source_id.clone(),
            title: record.title.clone(),
            error: error.to_string(),
        }
    }
}
