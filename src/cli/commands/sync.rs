//! Sync command implementation.
//!
//! Builds resolved [`Settings`] from flags and environment, connects the
//! API client, runs the engine, and prints the end-of-run summary. This is
//! also what a bare `notepress` invocation executes.

use colored::Colorize;

use crate::cli::SyncArgs;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::notion::{NotionClient, TreeLimits};
use crate::sync::{RunSummary, SyncEngine};

/// Execute the sync command.
pub fn execute(args: &SyncArgs, dry_run: bool, json: bool) -> Result<()> {
    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    rt.block_on(execute_async(args, dry_run, json))
}

async fn execute_async(args: &SyncArgs, dry_run: bool, json: bool) -> Result<()> {
    let settings = resolve_settings(args, dry_run);
    settings.validate()?;

    let client = NotionClient::connect(
        &settings.token,
        settings.data_source_id.as_deref(),
        settings.database_id.as_deref(),
        &settings.status_property,
        settings.retry_policy(),
    )
    .await?;

    let options = settings.sync_options();
    let summary = SyncEngine::new(&client, &options).run().await?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "dry_run": settings.dry_run,
            "out_dir": settings.out_dir.display().to_string(),
            "summary": summary,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        print_summary(&summary, &settings);
    }

    Ok(())
}

fn resolve_settings(args: &SyncArgs, dry_run: bool) -> Settings {
    Settings {
        token: args.token.clone().unwrap_or_default(),
        data_source_id: args.data_source_id.clone(),
        database_id: args.database_id.clone(),
        out_dir: args.out_dir.clone(),
        layout: args.layout.clone(),
        status_property: args.status_property.clone(),
        status_value: args.status_value.clone(),
        limits: TreeLimits {
            max_depth: args.max_depth,
            max_nodes: args.max_blocks,
        },
        max_retries: args.max_retries,
        concurrency: args.concurrency,
        max_failures: args.max_failures,
        keep_ineligible: args.keep_ineligible,
        dry_run,
    }
}

fn print_summary(summary: &RunSummary, settings: &Settings) {
    if settings.dry_run {
        println!("{}", "Dry run: no files were written.".yellow().bold());
        println!();
    }

    if summary.is_empty() {
        println!("Nothing to sync.");
        return;
    }

    println!("Sync complete: {}", settings.out_dir.display());
    println!();
    if summary.created > 0 {
        println!("  {}   {}", "Created:".green().bold(), summary.created);
    }
    if summary.updated > 0 {
        println!("  {}   {}", "Updated:".cyan().bold(), summary.updated);
    }
    if summary.unchanged > 0 {
        println!("  Unchanged: {}", summary.unchanged);
    }
    if summary.skipped > 0 {
        println!("  Skipped:   {}", summary.skipped);
    }
    if summary.deleted > 0 {
        println!("  {}   {}", "Deleted:".red().bold(), summary.deleted);
    }
    if summary.failed > 0 {
        println!("  {}    {}", "Failed:".red().bold(), summary.failed);
    }

    if !summary.failures.is_empty() {
        println!();
        println!("{}", "Failures".red().bold());
        for failure in &summary.failures {
            println!(
                "  {} {} ({}): {}",
                "✗".red(),
                failure.title,
                failure.source_id,
                failure.error
            );
        }
    }

    println!();
    println!("  Total: {} documents", summary.total());
}
