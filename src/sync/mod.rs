//! Manifest-backed synchronization of rendered documents to disk.
//!
//! This module makes repeat runs idempotent and safe:
//!
//! - **Engine**: one fetch → filter → render → write pass per run
//! - **Writer**: hash-gated creates, rewrites, renames, and pruning
//! - **Manifest**: persisted map of source id → owned file + content hash
//! - **Hashing**: SHA256 over the full file text for change detection
//!
//! # Architecture
//!
//! The engine only ever mutates files listed in the manifest:
//! 1. Load the manifest from the output directory (missing file = first run)
//! 2. Fetch the document listing and drop ineligible pages
//! 3. Load block trees and render files concurrently, collecting per-document failures
//! 4. Apply writes serially; skip files whose recorded hash still matches
//! 5. Prune tracked files whose pages left the retained set
//! 6. Persist the manifest so it mirrors the directory
//!
//! Hand-written files in the same directory are invisible to all of this.
//!
//! # Example
//!
//! ```ignore
//! use notepress::sync::{SyncEngine, SyncOptions};
//!
//! let options = SyncOptions { dry_run: true, ..SyncOptions::default() };
//! let summary = SyncEngine::new(&client, &options).run().await?;
//! println!("{} created, {} deleted", summary.created, summary.deleted);
//! ```

mod engine;
mod file;
mod hash;
mod manifest;
mod types;
mod writer;

// Re-export main types and functions
pub use engine::{SyncEngine, SyncOptions};
pub use file::atomic_write;
pub use hash::{content_hash, has_changed};
pub use manifest::{Manifest, ManifestEntry, MANIFEST_FILE};
pub use types::{DocumentFailure, RunSummary};
pub use writer::{SyncWriter, WriteOutcome};
