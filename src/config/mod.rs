//! Runtime configuration for sync runs.
//!
//! Settings are resolved before any network or filesystem work starts:
//! CLI flags win, environment variables fill the gaps (a local `.env`
//! file is loaded into the environment at startup), and documented
//! defaults cover the rest. Validation failures surface as
//! [`Error::Config`] so a misconfigured run exits before touching the
//! output directory.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::EligibilityRule;
use crate::notion::{RetryPolicy, TreeLimits};
use crate::sync::SyncOptions;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "_articles";

/// Default `layout` value written into front matter.
pub const DEFAULT_LAYOUT: &str = "article";

/// Default name of the status property checked for eligibility.
pub const DEFAULT_STATUS_PROPERTY: &str = "Status";

/// Default status value a page must carry to be published.
pub const DEFAULT_STATUS_VALUE: &str = "Done";

/// Fully resolved settings for one invocation.
///
/// Built by the CLI layer from flags and environment, then validated
/// here. Everything downstream (client, engine) consumes this instead
/// of reading the environment itself.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bearer token for the remote API.
    ///
    /// Sources, in priority order: `--token`, `NOTION_API_KEY`.
    pub token: String,

    /// Data source to query, when known directly.
    ///
    /// Sources: `--data-source-id`, `NOTION_DATA_SOURCE_ID`.
    pub data_source_id: Option<String>,

    /// Database whose data sources are discovered when no data source id
    /// is given. Discovery fails if the database has more than one.
    ///
    /// Sources: `--database-id`, `NOTION_DB_ID`.
    pub database_id: Option<String>,

    /// Directory receiving Markdown files and the manifest.
    pub out_dir: PathBuf,

    /// `layout` value stamped into every file's front matter.
    pub layout: String,

    /// Status property name checked for eligibility.
    pub status_property: String,

    /// Status value a page must equal to be published.
    pub status_value: String,

    /// Depth and node ceilings for block tree loading.
    pub limits: TreeLimits,

    /// Retries per remote call after the initial attempt.
    pub max_retries: u32,

    /// Maximum documents loaded concurrently.
    pub concurrency: usize,

    /// Per-document failure budget; exceeding it fails the run.
    pub max_failures: Option<usize>,

    /// Keep files for fetched-but-ineligible pages.
    pub keep_ineligible: bool,

    /// Report what would change without writing anything.
    pub dry_run: bool,
}

impl Settings {
    /// Check that the settings describe a runnable sync.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the API token is missing, when
    /// neither a data source nor a database id is configured, or when a
    /// limit is set to a value that could never make progress.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::Config(
                "missing API credential (token is empty)".to_string(),
            ));
        }

        if self.data_source_id.is_none() && self.database_id.is_none() {
            return Err(Error::Config(
                "no data source configured: need a data source id or a database id".to_string(),
            ));
        }

        if self.limits.max_depth == 0 {
            return Err(Error::Config("max depth must be at least 1".to_string()));
        }
        if self.limits.max_nodes == 0 {
            return Err(Error::Config("max blocks must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }

        Ok(())
    }

    /// The eligibility predicate these settings describe.
    #[must_use]
    pub fn eligibility_rule(&self) -> EligibilityRule {
        EligibilityRule::new(&self.status_property, &self.status_value)
    }

    /// Retry policy for remote calls: the configured retry count on top
    /// of the initial attempt, with default backoff delays.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.max_retries.saturating_add(1))
    }

    /// Engine options derived from these settings.
    #[must_use]
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            out_dir: self.out_dir.clone(),
            layout: self.layout.clone(),
            rule: self.eligibility_rule(),
            limits: self.limits,
            concurrency: self.concurrency,
            max_failures: self.max_failures,
            keep_ineligible: self.keep_ineligible,
            dry_run: self.dry_run,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: String::new(),
            data_source_id: None,
            database_id: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            layout: DEFAULT_LAYOUT.to_string(),
            status_property: DEFAULT_STATUS_PROPERTY.to_string(),
            status_value: DEFAULT_STATUS_VALUE.to_string(),
            limits: TreeLimits::default(),
            max_retries: 3,
            concurrency: 4,
            max_failures: None,
            keep_ineligible: false,
            dry_run: false,
        }
    }
}
