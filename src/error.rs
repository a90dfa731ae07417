//! Error types for notepress.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=config, 3=fetch, 4=write, 5=document, 6=io)
//! - Retryability flags for scripted callers
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for notepress operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or on the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Config (exit 2)
    ConfigError,
    MultipleDataSources,

    // Fetch (exit 3)
    FetchError,

    // Write (exit 4)
    WriteError,

    // Document (exit 5)
    TreeTooLarge,
    MalformedTree,
    TooManyFailures,

    // I/O (exit 6)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::MultipleDataSources => "MULTIPLE_DATA_SOURCES",
            Self::FetchError => "FETCH_ERROR",
            Self::WriteError => "WRITE_ERROR",
            Self::TreeTooLarge => "TREE_TOO_LARGE",
            Self::MalformedTree => "MALFORMED_TREE",
            Self::TooManyFailures => "TOO_MANY_FAILURES",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-6).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConfigError | Self::MultipleDataSources => 2,
            Self::FetchError => 3,
            Self::WriteError => 4,
            Self::TreeTooLarge | Self::MalformedTree | Self::TooManyFailures => 5,
            Self::IoError | Self::JsonError => 6,
        }
    }

    /// Whether re-running the same command may succeed without changes.
    ///
    /// True for fetch errors (transient network / rate limiting). False
    /// for config, document, or filesystem errors, which need a fix first.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchError)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in notepress operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database {database_id} has {} data sources", candidates.len())]
    MultipleDataSources {
        database_id: String,
        /// (id, name) of each data source under the database.
        candidates: Vec<(String, String)>,
    },

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Block tree for {source_id} exceeds limits: {detail}")]
    TreeTooLarge { source_id: String, detail: String },

    #[error("Malformed block tree for {source_id}: {detail}")]
    MalformedTree { source_id: String, detail: String },

    #[error("Write failed for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{failed} of {total} documents failed (limit {limit})")]
    TooManyFailures {
        failed: usize,
        total: usize,
        limit: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::ConfigError,
            Self::MultipleDataSources { .. } => ErrorCode::MultipleDataSources,
            Self::Fetch(_) => ErrorCode::FetchError,
            Self::TreeTooLarge { .. } => ErrorCode::TreeTooLarge,
            Self::MalformedTree { .. } => ErrorCode::MalformedTree,
            Self::Write { .. } => ErrorCode::WriteError,
            Self::TooManyFailures { .. } => ErrorCode::TooManyFailures,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for humans and scripts.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Config(msg) => {
                if msg.contains("credential") || msg.contains("token") {
                    Some(
                        "Set NOTION_API_KEY (or put it in .env), or pass --token".to_string(),
                    )
                } else if msg.contains("data source") || msg.contains("database") {
                    Some(
                        "Pass --data-source-id, or --database-id to resolve one automatically"
                            .to_string(),
                    )
                } else {
                    None
                }
            }

            Self::MultipleDataSources { candidates, .. } => {
                let mut hint = String::from("Pick one with --data-source-id:\n");
                for (id, name) in candidates {
                    hint.push_str(&format!("    {id}  \"{name}\"\n"));
                }
                hint.push_str("  Or set NOTION_DATA_SOURCE_ID");
                Some(hint)
            }

            Self::Fetch(_) => Some(
                "Verify the token has access to the data source and retry. \
                 Transient failures are retried automatically before reaching this error."
                    .to_string(),
            ),

            Self::TreeTooLarge { .. } => Some(
                "Raise --max-depth / --max-blocks if the document is legitimately this large"
                    .to_string(),
            ),

            Self::Write { path, .. } => Some(format!(
                "Check permissions and free space for {}",
                path.display()
            )),

            Self::TooManyFailures { .. } => Some(
                "Inspect the failures listed above; fix upstream or raise --max-failures"
                    .to_string(),
            ),

            Self::MalformedTree { .. } | Self::Io(_) | Self::Json(_) | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    ///
    /// Includes error code, message, retryability, exit code, and
    /// optional recovery hint. Scripts parse this instead of stderr text.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
