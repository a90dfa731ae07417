//! Slug derivation and collision handling.
//!
//! Slugs become file names, so they must be stable across runs (the
//! source-id → path mapping is part of the sync contract) and distinct
//! within a run even when two titles normalize identically.

use std::collections::BTreeMap;

use crate::model::DocumentRecord;

/// Normalize a title into a URL-safe slug.
///
/// Lowercases, collapses every run of non-alphanumeric characters into a
/// single hyphen, and strips leading/trailing hyphens. Non-ASCII
/// characters count as separators.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug for a document: the normalized title, or the short source id when
/// the title normalizes to nothing.
#[must_use]
pub fn document_slug(record: &DocumentRecord) -> String {
    let slug = slugify(&record.title);
    if slug.is_empty() { record.short_id() } else { slug }
}

/// Assign a distinct slug to every record, deterministically.
///
/// `prior` maps source ids to the slug they held in the last run's
/// manifest. When several records normalize to the same base slug, the
/// prior holder keeps it; with no prior holder the smallest source id
/// keeps it. Every other collider gets `-<short id>` appended.
#[must_use]
pub fn assign_slugs(
    records: &[DocumentRecord],
    prior: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut by_base: BTreeMap<String, Vec<&DocumentRecord>> = BTreeMap::new();
    for record in records {
        by_base.entry(document_slug(record)).or_default().push(record);
    }

    let mut assigned = BTreeMap::new();
    for (base, group) in by_base {
        if let [only] = group.as_slice() {
            assigned.insert(only.source_id.clone(), base);
            continue;
        }

        let keeper = group
            .iter()
            .find(|r| prior.get(&r.source_id) == Some(&base))
            .or_else(|| group.iter().min_by_key(|r| &r.source_id))
            .map(|r| r.source_id.clone());

        for record in group {
            let slug = if Some(&record.source_id) == keeper.as_ref() {
                base.clone()
            } else {
                format!("{base}-{}", record.short_id())
            };
            assigned.insert(record.source_id.clone(), slug);
        }
    }

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, title: &str) -> DocumentRecord {
        DocumentRecord {
            source_id: id.to_string(),
            title: title.to_string(),
            status: Some("Done".to_string()),
            tags: vec![],
            date: None,
            last_edited_time: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            archived: false,
        }
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("My First Post"), "my-first-post");
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  spaced  out  "), "spaced-out");
    }

    #[test]
    fn test_slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("a --- b"), "a-b");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("Rust 2024: What's New?"), "rust-2024-what-s-new");
    }

    #[test]
    fn test_slugify_non_ascii_as_separator() {
        assert_eq!(slugify("Café au lait"), "caf-au-lait");
    }

    #[test]
    fn test_document_slug_falls_back_to_short_id() {
        let rec = record("a1b2c3d4-e5f6", "!!!");
        assert_eq!(document_slug(&rec), "a1b2c3d4");
    }

    #[test]
    fn test_assign_slugs_no_collision() {
        let records = vec![record("id-a", "First"), record("id-b", "Second")];
        let assigned = assign_slugs(&records, &BTreeMap::new());
        assert_eq!(assigned["id-a"], "first");
        assert_eq!(assigned["id-b"], "second");
    }

    #[test]
    fn test_assign_slugs_collision_smallest_id_keeps_base() {
        let records = vec![record("id-b", "Same Title"), record("id-a", "Same  Title!")];
        let assigned = assign_slugs(&records, &BTreeMap::new());
        assert_eq!(assigned["id-a"], "same-title");
        assert_eq!(assigned["id-b"], "same-title-idb");
    }

    #[test]
    fn test_assign_slugs_collision_prior_holder_keeps_base() {
        let records = vec![record("id-b", "Same Title"), record("id-a", "Same Title")];
        let mut prior = BTreeMap::new();
        prior.insert("id-b".to_string(), "same-title".to_string());

        let assigned = assign_slugs(&records, &prior);
        assert_eq!(assigned["id-b"], "same-title");
        assert_eq!(assigned["id-a"], "same-title-ida");
    }

    #[test]
    fn test_assign_slugs_is_deterministic() {
        let records = vec![
            record("id-c", "Post"),
            record("id-a", "Post"),
            record("id-b", "Post"),
        ];
        let first = assign_slugs(&records, &BTreeMap::new());
        let second = assign_slugs(&records, &BTreeMap::new());
        assert_eq!(first, second);
        assert_eq!(first["id-a"], "post");
    }
}
