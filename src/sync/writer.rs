//! Idempotent application of rendered documents to the output directory.
//!
//! The writer compares each rendered file against the manifest and touches
//! disk only when something actually changed. All mutation of the output
//! directory happens here: creates, rewrites, renames, and pruning of files
//! whose pages are no longer retained. Persisting the manifest afterwards is
//! the caller's job.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::render::RenderedDocument;
use crate::sync::file::atomic_write;
use crate::sync::hash::{content_hash, has_changed};
use crate::sync::manifest::Manifest;

/// What applying one rendered document did to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No manifest entry existed; a new file was written.
    Created,
    /// Content or file name differed from the manifest; the file was rewritten.
    Updated,
    /// Hash and path match the manifest and the file is present on disk.
    Unchanged,
}

/// Applies rendered documents against the manifest.
///
/// In dry-run mode outcomes are computed and the in-memory manifest is
/// updated as usual, but nothing on disk changes and the caller must not
/// persist the manifest.
pub struct SyncWriter<'a> {
    out_dir: &'a Path,
    manifest: &'a mut Manifest,
    dry_run: bool,
    /// File names produced this run. A slug freed by one document may
    /// already have been taken by another, so rename and prune cleanup
    /// must never delete a path in this set.
    written: HashSet<String>,
}

impl<'a> SyncWriter<'a> {
    /// Create a writer over an output directory and its loaded manifest.
    pub fn new(out_dir: &'a Path, manifest: &'a mut Manifest, dry_run: bool) -> Self {
        Self {
            out_dir,
            manifest,
            dry_run,
            written: HashSet::new(),
        }
    }

    /// Apply one rendered document, returning what happened.
    ///
    /// Unchanged documents are detected by hash and file name, with an
    /// existence check so a hand-deleted file gets restored. A slug change
    /// writes the new file and removes the old one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the file (or the stale file it replaces)
    /// cannot be written or removed.
    pub fn apply(&mut self, doc: &RenderedDocument) -> Result<WriteOutcome> {
        let file_name = format!("{}.md", doc.slug);
        let target = self.out_dir.join(&file_name);
        let hash = content_hash(&doc.file_text);

        let prior = self.manifest.entry(&doc.source_id).cloned();

        if let Some(prior) = &prior {
            let same_content = !has_changed(&hash, Some(&prior.hash));
            if same_content && prior.path == file_name && target.exists() {
                self.written.insert(file_name);
                return Ok(WriteOutcome::Unchanged);
            }
        }

        if !self.dry_run {
            if let Some(prior) = &prior {
                if prior.path != file_name && !self.written.contains(&prior.path) {
                    let old = self.out_dir.join(&prior.path);
                    if old.exists() {
                        fs::remove_file(&old).map_err(|source| Error::Write {
                            path: old.clone(),
                            source,
                        })?;
                    }
                }
            }

            atomic_write(&target, &doc.file_text).map_err(|source| Error::Write {
                path: target.clone(),
                source,
            })?;
        }

        self.manifest.record(&doc.source_id, &file_name, &hash);
        self.written.insert(file_name);

        Ok(if prior.is_some() {
            WriteOutcome::Updated
        } else {
            WriteOutcome::Created
        })
    }

    /// Delete tracked files whose source ids are not in `retained`.
    ///
    /// Returns the file names removed, in manifest (sorted) order. Entries
    /// leave the manifest even when the file was already gone from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if a stale file cannot be removed.
    pub fn prune(&mut self, retained: &HashSet<String>) -> Result<Vec<String>> {
        let stale: Vec<String> = self
            .manifest
            .source_ids()
            .into_iter()
            .filter(|id| !retained.contains(id))
            .collect();

        let mut deleted = Vec::new();
        for source_id in stale {
            let Some(entry) = self.manifest.entry(&source_id).cloned() else {
                continue;
            };

            if !self.dry_run && !self.written.contains(&entry.path) {
                let path = self.out_dir.join(&entry.path);
                if path.exists() {
                    fs::remove_file(&path).map_err(|source| Error::Write {
                        path: path.clone(),
                        source,
                    })?;
                }
            }

            self.manifest.remove(&source_id);
            deleted.push(entry.path);
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_doc(source_id: &str, slug: &str, body: &str) -> RenderedDocument {
        RenderedDocument {
            source_id: source_id.to_string(),
            slug: slug.to_string(),
            file_text: format!("---\ntitle: \"T\"\n---\n\n{body}\n"),
        }
    }

    fn retained(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_apply_creates_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();
        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);

        let doc = make_doc("page-1", "hello", "Hello.");
        let outcome = writer.apply(&doc).unwrap();

        assert_eq!(outcome, WriteOutcome::Created);
        let written = fs::read_to_string(temp_dir.path().join("hello.md")).unwrap();
        assert_eq!(written, doc.file_text);
        assert_eq!(manifest.entry("page-1").unwrap().path, "hello.md");
    }

    #[test]
    fn test_apply_identical_content_is_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();
        let doc = make_doc("page-1", "hello", "Hello.");

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&doc).unwrap();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        assert_eq!(writer.apply(&doc).unwrap(), WriteOutcome::Unchanged);
    }

    #[test]
    fn test_apply_changed_content_is_updated() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&make_doc("page-1", "hello", "Before.")).unwrap();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        let after = make_doc("page-1", "hello", "After.");
        assert_eq!(writer.apply(&after).unwrap(), WriteOutcome::Updated);

        let written = fs::read_to_string(temp_dir.path().join("hello.md")).unwrap();
        assert_eq!(written, after.file_text);
    }

    #[test]
    fn test_apply_slug_change_moves_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&make_doc("page-1", "old-title", "Body.")).unwrap();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        let renamed = make_doc("page-1", "new-title", "Body.");
        assert_eq!(writer.apply(&renamed).unwrap(), WriteOutcome::Updated);

        assert!(!temp_dir.path().join("old-title.md").exists());
        assert!(temp_dir.path().join("new-title.md").exists());
        assert_eq!(manifest.entry("page-1").unwrap().path, "new-title.md");
    }

    #[test]
    fn test_apply_restores_hand_deleted_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();
        let doc = make_doc("page-1", "hello", "Hello.");

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&doc).unwrap();
        fs::remove_file(temp_dir.path().join("hello.md")).unwrap();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        assert_eq!(writer.apply(&doc).unwrap(), WriteOutcome::Updated);
        assert!(temp_dir.path().join("hello.md").exists());
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();
        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, true);

        let outcome = writer.apply(&make_doc("page-1", "hello", "Hello.")).unwrap();

        assert_eq!(outcome, WriteOutcome::Created);
        assert!(!temp_dir.path().join("hello.md").exists());
    }

    #[test]
    fn test_prune_removes_stale_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&make_doc("page-1", "keep", "Keep.")).unwrap();
        writer.apply(&make_doc("page-2", "drop", "Drop.")).unwrap();

        let deleted = writer.prune(&retained(&["page-1"])).unwrap();

        assert_eq!(deleted, vec!["drop.md".to_string()]);
        assert!(temp_dir.path().join("keep.md").exists());
        assert!(!temp_dir.path().join("drop.md").exists());
        assert!(manifest.entry("page-2").is_none());
    }

    #[test]
    fn test_prune_spares_path_taken_over_this_run() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();
        manifest.record("page-old", "shared.md", "stale-hash");

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&make_doc("page-new", "shared", "New owner.")).unwrap();

        let deleted = writer.prune(&retained(&["page-new"])).unwrap();

        // page-old leaves the manifest but the file now belongs to page-new
        assert_eq!(deleted, vec!["shared.md".to_string()]);
        assert!(temp_dir.path().join("shared.md").exists());
        assert!(manifest.entry("page-old").is_none());
        assert!(manifest.entry("page-new").is_some());
    }

    #[test]
    fn test_rename_skips_deleting_reassigned_slug() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&make_doc("page-a", "first", "A v1.")).unwrap();

        // page-b takes "first" while page-a moves to "second"
        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&make_doc("page-b", "first", "B.")).unwrap();
        writer.apply(&make_doc("page-a", "second", "A v2.")).unwrap();

        let first = fs::read_to_string(temp_dir.path().join("first.md")).unwrap();
        assert!(first.contains("B."));
        assert!(temp_dir.path().join("second.md").exists());
    }

    #[test]
    fn test_dry_run_prune_keeps_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = Manifest::default();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, false);
        writer.apply(&make_doc("page-1", "stale", "Old.")).unwrap();

        let mut writer = SyncWriter::new(temp_dir.path(), &mut manifest, true);
        let deleted = writer.prune(&retained(&[])).unwrap();

        assert_eq!(deleted, vec!["stale.md".to_string()]);
        assert!(temp_dir.path().join("stale.md").exists());
    }
}
