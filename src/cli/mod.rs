//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    DEFAULT_LAYOUT, DEFAULT_OUT_DIR, DEFAULT_STATUS_PROPERTY, DEFAULT_STATUS_VALUE,
};
use crate::notion::TreeLimits;

pub mod commands;

/// notepress - sync Notion database pages to static-site Markdown articles
#[derive(Parser, Debug)]
#[command(name = "notepress", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sync options for the default (no subcommand) invocation.
    #[command(flatten)]
    pub sync: SyncArgs,

    /// Preview changes without writing to the output directory
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output as JSON (for scripts)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync eligible pages into the output directory (the default command)
    Sync(SyncArgs),

    /// Show the manifest and output directory state
    Status {
        /// Output directory holding the manifest
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
    },

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Everything a sync run can be told from the command line.
///
/// Credentials and ids fall back to environment variables so that a bare
/// `notepress` works once a `.env` file is in place.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// API token (sent as a Bearer credential)
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    pub token: Option<String>,

    /// Data source id to query directly
    #[arg(long, env = "NOTION_DATA_SOURCE_ID")]
    pub data_source_id: Option<String>,

    /// Database id whose single data source is discovered automatically
    #[arg(long, env = "NOTION_DB_ID")]
    pub database_id: Option<String>,

    /// Output directory for Markdown files and the manifest
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Layout value written into front matter
    #[arg(long, default_value = DEFAULT_LAYOUT)]
    pub layout: String,

    /// Page property that gates publication
    #[arg(long, default_value = DEFAULT_STATUS_PROPERTY)]
    pub status_property: String,

    /// Property value a page must carry to be published
    #[arg(long, default_value = DEFAULT_STATUS_VALUE)]
    pub status_value: String,

    /// Documents loaded concurrently
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Retries per API call after the first attempt
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    /// Maximum block nesting depth per document
    #[arg(long, default_value_t = TreeLimits::default().max_depth)]
    pub max_depth: usize,

    /// Maximum blocks per document
    #[arg(long, default_value_t = TreeLimits::default().max_nodes)]
    pub max_blocks: usize,

    /// Fail the run when more than this many documents fail
    #[arg(long)]
    pub max_failures: Option<usize>,

    /// Keep files for pages that are fetched but no longer eligible
    #[arg(long)]
    pub keep_ineligible: bool,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_parses() {
        let cli = Cli::parse_from(["notepress"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.sync.out_dir, PathBuf::from(DEFAULT_OUT_DIR));
        assert_eq!(cli.sync.status_value, "Done");
    }

    #[test]
    fn test_sync_subcommand_parses_flags() {
        let cli = Cli::parse_from([
            "notepress",
            "sync",
            "--out-dir",
            "site/_posts",
            "--status-value",
            "Published",
            "--max-depth",
            "10",
            "--dry-run",
        ]);

        match cli.command {
            Some(Commands::Sync(args)) => {
                assert_eq!(args.out_dir, PathBuf::from("site/_posts"));
                assert_eq!(args.status_value, "Published");
                assert_eq!(args.max_depth, 10);
            }
            other => panic!("expected sync subcommand, got {other:?}"),
        }
        assert!(cli.dry_run);
    }

    #[test]
    fn test_status_subcommand_parses() {
        let cli = Cli::parse_from(["notepress", "status", "--out-dir", "content"]);
        match cli.command {
            Some(Commands::Status { out_dir }) => {
                assert_eq!(out_dir, PathBuf::from("content"));
            }
            other => panic!("expected status subcommand, got {other:?}"),
        }
    }
}
