//! Sync run orchestration.
//!
//! One run is a single pass: list documents, filter for eligibility,
//! load and render eligible pages concurrently, then apply writes and
//! deletions serially against the manifest. Per-document failures are
//! recorded and the run continues; only listing failures, systemic write
//! failures, and an exceeded failure threshold abort it.

use std::collections::HashSet;
use std::path::PathBuf;

use futures::stream::{self, StreamExt};

use crate::error::{Error, Result};
use crate::model::{DocumentRecord, EligibilityRule};
use crate::notion::{DocumentSource, TreeLimits, TreeLoader};
use crate::render::{assign_slugs, RenderedDocument};
use crate::sync::manifest::Manifest;
use crate::sync::types::{DocumentFailure, RunSummary};
use crate::sync::writer::{SyncWriter, WriteOutcome};

/// Behavior knobs for one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Directory that receives Markdown files and the manifest.
    pub out_dir: PathBuf,
    /// `layout` value stamped into every file's front matter.
    pub layout: String,
    /// Which fetched documents get published.
    pub rule: EligibilityRule,
    /// Depth and node ceilings for block tree loading.
    pub limits: TreeLimits,
    /// Maximum documents loaded concurrently.
    pub concurrency: usize,
    /// Fail the run when more than this many documents fail.
    /// `None` records failures but keeps the run successful.
    pub max_failures: Option<usize>,
    /// Retain files for fetched-but-ineligible pages instead of pruning
    /// them. Archived pages are always pruned.
    pub keep_ineligible: bool,
    /// Compute and report everything, touch nothing on disk.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("_articles"),
            layout: "article".to_string(),
            rule: EligibilityRule::default(),
            limits: TreeLimits::default(),
            concurrency: 4,
            max_failures: None,
            keep_ineligible: false,
            dry_run: false,
        }
    }
}

/// Drives a full sync of one document source into one output directory.
pub struct SyncEngine<'a, S: DocumentSource> {
    source: &'a S,
    options: &'a SyncOptions,
}

impl<'a, S: DocumentSource> SyncEngine<'a, S> {
    #[must_use]
    pub fn new(source: &'a S, options: &'a SyncOptions) -> Self {
        Self { source, options }
    }

    /// Run one full sync, returning the end-of-run summary.
    ///
    /// The manifest is persisted after writes and deletions have been
    /// applied, so it always reflects what is actually on disk. Nothing
    /// is persisted in dry-run mode or when the listing fetch fails.
    ///
    /// # Errors
    ///
    /// Returns an error for unusable configuration or manifest, a failed
    /// document listing, a write failure affecting every document, or
    /// more per-document failures than `max_failures` allows.
    pub async fn run(&self) -> Result<RunSummary> {
        let opts = self.options;

        let mut manifest = Manifest::load(&opts.out_dir)?;
        tracing::debug!(tracked = manifest.len(), "loaded manifest");

        let records = self.source.list_documents().await?;
        tracing::info!(fetched = records.len(), "fetched document listing");

        let (eligible, ineligible): (Vec<DocumentRecord>, Vec<DocumentRecord>) = records
            .into_iter()
            .partition(|record| opts.rule.is_eligible(record));

        for record in &ineligible {
            tracing::debug!(
                source_id = %record.source_id,
                title = %record.title,
                "skipping ineligible document"
            );
        }

        let slugs = assign_slugs(&eligible, &manifest.prior_slugs());
        let loader = TreeLoader::new(self.source, opts.limits);

        let mut results: Vec<(DocumentRecord, Result<RenderedDocument>)> =
            stream::iter(eligible.iter())
                .map(|record| {
                    let loader = &loader;
                    let slugs = &slugs;
                    let layout = opts.layout.as_str();
                    async move {
                        let slug = slugs
                            .get(&record.source_id)
                            .cloned()
                            .unwrap_or_else(|| record.short_id());
                        let rendered = loader.load(&record.source_id).await.map(|blocks| {
                            RenderedDocument::assemble(record, &slug, layout, &blocks)
                        });
                        (record.clone(), rendered)
                    }
                })
                .buffer_unordered(opts.concurrency.max(1))
                .collect()
                .await;

        // completion order is nondeterministic; apply in source id order
        results.sort_by(|a, b| a.0.source_id.cmp(&b.0.source_id));

        let mut summary = RunSummary {
            skipped: ineligible.len(),
            ..RunSummary::default()
        };
        let mut attempted = 0usize;
        let mut write_failures = 0usize;
        let mut last_write_error = None;

        {
            let mut writer = SyncWriter::new(&opts.out_dir, &mut manifest, opts.dry_run);

            for (record, rendered) in results {
                match rendered {
                    Ok(doc) => {
                        attempted += 1;
                        match writer.apply(&doc) {
                            Ok(WriteOutcome::Created) => {
                                summary.created += 1;
                                tracing::info!(slug = %doc.slug, "created");
                            }
                            Ok(WriteOutcome::Updated) => {
                                summary.updated += 1;
                                tracing::info!(slug = %doc.slug, "updated");
                            }
                            Ok(WriteOutcome::Unchanged) => {
                                summary.unchanged += 1;
                                tracing::debug!(slug = %doc.slug, "unchanged");
                            }
                            Err(err) => {
                                write_failures += 1;
                                summary.failed += 1;
                                tracing::error!(
                                    source_id = %record.source_id,
                                    error = %err,
                                    "write failed"
                                );
                                summary.failures.push(DocumentFailure::new(&record, &err));
                                last_write_error = Some(err);
                            }
                        }
                    }
                    Err(err) => {
                        summary.failed += 1;
                        tracing::error!(
                            source_id = %record.source_id,
                            error = %err,
                            "document failed"
                        );
                        summary.failures.push(DocumentFailure::new(&record, &err));
                    }
                }
            }

            // every write failing points at the directory, not the documents
            if attempted > 0 && write_failures == attempted {
                if let Some(err) = last_write_error {
                    return Err(err);
                }
            }

            let retained: HashSet<String> = if opts.keep_ineligible {
                eligible
                    .iter()
                    .chain(ineligible.iter().filter(|record| !record.archived))
                    .map(|record| record.source_id.clone())
                    .collect()
            } else {
                eligible
                    .iter()
                    .map(|record| record.source_id.clone())
                    .collect()
            };

            let deleted = writer.prune(&retained)?;
            summary.deleted = deleted.len();
            for path in &deleted {
                tracing::info!(path = %path, "deleted");
            }
        }

        if !opts.dry_run {
            manifest.persist(&opts.out_dir)?;
        }

        if let Some(limit) = opts.max_failures {
            if summary.failed > limit {
                return Err(Error::TooManyFailures {
                    failed: summary.failed,
                    total: summary.processed(),
                    limit,
                });
            }
        }

        Ok(summary)
    }
}
