//! Document metadata model.
//!
//! A `DocumentRecord` is the per-page metadata returned by the remote
//! listing query, before any block content is loaded. Eligibility for
//! publication is decided from this record alone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one remote document.
///
/// Identity is `source_id`; records are re-fetched fresh every run and
/// never cached across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Opaque stable identifier assigned by the remote source.
    pub source_id: String,

    /// Document title (may be empty upstream).
    pub title: String,

    /// Value of the configured status property, if the page has one.
    pub status: Option<String>,

    /// Tag names from the page's tag property.
    pub tags: Vec<String>,

    /// Recorded publish date property, if set.
    pub date: Option<NaiveDate>,

    /// Last-edited timestamp reported by the source.
    pub last_edited_time: DateTime<Utc>,

    /// Whether the page is archived (in trash) upstream.
    pub archived: bool,
}

impl DocumentRecord {
    /// Publish date for front matter: the recorded date property when
    /// present, otherwise the date of the last edit. Never "now", so
    /// re-rendering unchanged content stays byte-identical.
    #[must_use]
    pub fn publish_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| self.last_edited_time.date_naive())
    }

    /// First 8 hex characters of the source id, hyphens removed.
    ///
    /// Used as a slug fallback for untitled documents and as a collision
    /// suffix.
    #[must_use]
    pub fn short_id(&self) -> String {
        self.source_id.chars().filter(|c| *c != '-').take(8).collect()
    }
}

/// Predicate deciding whether a document is ready to publish.
///
/// Pure function of the record: the configured status property must equal
/// the configured value, and the page must not be archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRule {
    /// Name of the status property on the remote page.
    pub property: String,

    /// Value the property must equal.
    pub equals: String,
}

impl EligibilityRule {
    #[must_use]
    pub fn new(property: &str, equals: &str) -> Self {
        Self {
            property: property.to_string(),
            equals: equals.to_string(),
        }
    }

    /// Whether this record should be published.
    #[must_use]
    pub fn is_eligible(&self, record: &DocumentRecord) -> bool {
        !record.archived && record.status.as_deref() == Some(self.equals.as_str())
    }
}

impl Default for EligibilityRule {
    fn default() -> Self {
        Self::new("Status", "Done")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(status: Option<&str>, archived: bool) -> DocumentRecord {
        DocumentRecord {
            source_id: "a1b2c3d4-e5f6-7890-abcd-ef1234567890".to_string(),
            title: "Test Page".to_string(),
            status: status.map(String::from),
            tags: vec![],
            date: None,
            last_edited_time: Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
            archived,
        }
    }

    #[test]
    fn test_eligibility_matches_configured_value() {
        let rule = EligibilityRule::default();
        assert!(rule.is_eligible(&record(Some("Done"), false)));
        assert!(!rule.is_eligible(&record(Some("In Progress"), false)));
        assert!(!rule.is_eligible(&record(None, false)));
    }

    #[test]
    fn test_eligibility_rejects_archived() {
        let rule = EligibilityRule::default();
        assert!(!rule.is_eligible(&record(Some("Done"), true)));
    }

    #[test]
    fn test_eligibility_custom_rule() {
        let rule = EligibilityRule::new("Stage", "Completed");
        assert!(rule.is_eligible(&record(Some("Completed"), false)));
        assert!(!rule.is_eligible(&record(Some("Done"), false)));
    }

    #[test]
    fn test_publish_date_prefers_recorded_date() {
        let mut rec = record(Some("Done"), false);
        rec.date = Some(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(rec.publish_date(), NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
    }

    #[test]
    fn test_publish_date_falls_back_to_last_edited() {
        let rec = record(Some("Done"), false);
        assert_eq!(rec.publish_date(), NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
    }

    #[test]
    fn test_short_id_strips_hyphens() {
        let rec = record(None, false);
        assert_eq!(rec.short_id(), "a1b2c3d4");
    }
}
