//! Manifest of files owned by the sync engine.
//!
//! The manifest lives inside the output directory and maps each source page
//! id to the file written for it plus a hash of that file's text. It is the
//! only state carried between runs: it drives the unchanged check, slug
//! stability across renames, and deletion of files whose pages left the
//! eligible set. Files not listed in the manifest are never touched.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sync::file::atomic_write;

/// Manifest file name inside the output directory.
pub const MANIFEST_FILE: &str = ".notepress-manifest.json";

/// One tracked output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name relative to the output directory (e.g. `getting-started.md`).
    pub path: String,
    /// SHA256 hash of the full file text at last write.
    pub hash: String,
}

/// Source id → tracked file, persisted as pretty JSON.
///
/// A `BTreeMap` keeps serialization order stable, so the manifest only
/// changes on disk when its contents change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Tracked documents keyed by source page id.
    #[serde(default)]
    documents: BTreeMap<String, ManifestEntry>,
}

impl Manifest {
    /// Path of the manifest file inside an output directory.
    #[must_use]
    pub fn path_in(out_dir: &Path) -> PathBuf {
        out_dir.join(MANIFEST_FILE)
    }

    /// Load the manifest from an output directory.
    ///
    /// A missing file is not an error: the first run starts from an empty
    /// manifest and builds it up as files are written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(out_dir: &Path) -> Result<Self> {
        let path = Self::path_in(out_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Persist the manifest atomically into the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn persist(&self, out_dir: &Path) -> Result<()> {
        let path = Self::path_in(out_dir);
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        atomic_write(&path, &text).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })
    }

    /// Look up the entry for a source id.
    #[must_use]
    pub fn entry(&self, source_id: &str) -> Option<&ManifestEntry> {
        self.documents.get(source_id)
    }

    /// Record (or replace) the entry for a source id.
    pub fn record(&mut self, source_id: &str, path: &str, hash: &str) {
        self.documents.insert(
            source_id.to_string(),
            ManifestEntry {
                path: path.to_string(),
                hash: hash.to_string(),
            },
        );
    }

    /// Remove the entry for a source id, returning it if present.
    pub fn remove(&mut self, source_id: &str) -> Option<ManifestEntry> {
        self.documents.remove(source_id)
    }

    /// All tracked source ids, in sorted order.
    ///
    /// Returned owned so callers can mutate the manifest while iterating.
    #[must_use]
    pub fn source_ids(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }

    /// Iterate over `(source_id, entry)` pairs in sorted order.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &ManifestEntry)> {
        self.documents.iter()
    }

    /// Slugs currently held per source id, derived from tracked file names.
    ///
    /// Feeds slug assignment so that on a collision the page that already
    /// owns a slug keeps it.
    #[must_use]
    pub fn prior_slugs(&self) -> BTreeMap<String, String> {
        self.documents
            .iter()
            .map(|(id, entry)| {
                let slug = entry
                    .path
                    .strip_suffix(".md")
                    .unwrap_or(&entry.path)
                    .to_string();
                (id.clone(), slug)
            })
            .collect()
    }

    /// Number of tracked documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no documents are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
