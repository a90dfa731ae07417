//! Status command implementation.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::sync::Manifest;

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    out_dir: String,
    manifest_exists: bool,
    tracked: Vec<TrackedFile>,
    untracked_markdown: Vec<String>,
}

#[derive(Serialize)]
struct TrackedFile {
    source_id: String,
    path: String,
    missing: bool,
}

/// Execute status command.
///
/// Reports which files the manifest owns, whether any of them have gone
/// missing from disk, and which Markdown files in the directory are not
/// tracked (and therefore never touched by a sync).
pub fn execute(out_dir: &Path, json: bool) -> Result<()> {
    let manifest_exists = Manifest::path_in(out_dir).exists();
    let manifest = Manifest::load(out_dir)?;

    let tracked: Vec<TrackedFile> = manifest
        .entries()
        .map(|(source_id, entry)| TrackedFile {
            source_id: source_id.clone(),
            path: entry.path.clone(),
            missing: !out_dir.join(&entry.path).exists(),
        })
        .collect();

    let untracked_markdown = untracked_markdown(out_dir, &manifest)?;

    if json {
        let output = StatusOutput {
            out_dir: out_dir.display().to_string(),
            manifest_exists,
            tracked,
            untracked_markdown,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("notepress Status");
    println!("================");
    println!();
    println!("Output directory: {}", out_dir.display());

    if !manifest_exists {
        println!();
        println!("No manifest found. Run 'notepress' to perform the first sync.");
        return Ok(());
    }

    println!("Tracked documents: {}", tracked.len());
    for file in &tracked {
        if file.missing {
            println!("  {} ({})  [missing on disk]", file.path, file.source_id);
        } else {
            println!("  {} ({})", file.path, file.source_id);
        }
    }

    if !untracked_markdown.is_empty() {
        println!();
        println!("Untracked Markdown (never modified by sync):");
        for name in &untracked_markdown {
            println!("  {name}");
        }
    }

    Ok(())
}

/// Markdown files in the directory that no manifest entry owns.
fn untracked_markdown(out_dir: &Path, manifest: &Manifest) -> Result<Vec<String>> {
    let owned: HashSet<&str> = manifest.entries().map(|(_, e)| e.path.as_str()).collect();

    let mut extra = Vec::new();
    if out_dir.is_dir() {
        for entry in fs::read_dir(out_dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".md") && !owned.contains(name.as_str()) {
                extra.push(name);
            }
        }
    }
    extra.sort();
    Ok(extra)
}
