//! YAML front matter assembly.
//!
//! The header schema is fixed: six keys, always present, always in the
//! same order, so generated files diff cleanly and the site generator
//! sees a stable shape. Values come from document metadata only.

use chrono::NaiveDate;

use crate::model::DocumentRecord;

/// Front matter for one rendered document.
///
/// Key order on emission: `title`, `date`, `slug`, `tags`, `layout`,
/// `source_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub date: NaiveDate,
    pub slug: String,
    pub tags: Vec<String>,
    pub layout: String,
    pub source_id: String,
}

impl FrontMatter {
    /// Build the header for a document under its assigned slug.
    #[must_use]
    pub fn for_document(record: &DocumentRecord, slug: &str, layout: &str) -> Self {
        Self {
            title: record.title.clone(),
            date: record.publish_date(),
            slug: slug.to_string(),
            tags: record.tags.clone(),
            layout: layout.to_string(),
            source_id: record.source_id.clone(),
        }
    }

    /// Emit the YAML header, including both `---` fences and a trailing
    /// newline.
    #[must_use]
    pub fn to_yaml(&self) -> String {
        let tags = self
            .tags
            .iter()
            .map(|t| quote(t))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::from("---\n");
        out.push_str(&format!("title: {}\n", quote(&self.title)));
        out.push_str(&format!("date: \"{}\"\n", self.date.format("%Y-%m-%d")));
        out.push_str(&format!("slug: {}\n", quote(&self.slug)));
        out.push_str(&format!("tags: [{tags}]\n"));
        out.push_str(&format!("layout: {}\n", self.layout));
        out.push_str(&format!("source_id: {}\n", quote(&self.source_id)));
        out.push_str("---\n");
        out
    }
}

/// Double-quoted YAML scalar with backslash and quote escaping.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str, tags: &[&str]) -> DocumentRecord {
        DocumentRecord {
            source_id: "src-1".to_string(),
            title: title.to_string(),
            status: Some("Done".to_string()),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            date: Some(NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()),
            last_edited_time: Utc.with_ymd_and_hms(2026, 2, 4, 12, 0, 0).unwrap(),
            archived: false,
        }
    }

    #[test]
    fn test_fixed_key_order() {
        let fm = FrontMatter::for_document(&record("My Post", &["rust", "notes"]), "my-post", "article");
        assert_eq!(
            fm.to_yaml(),
            "---\n\
             title: \"My Post\"\n\
             date: \"2026-02-03\"\n\
             slug: \"my-post\"\n\
             tags: [\"rust\", \"notes\"]\n\
             layout: article\n\
             source_id: \"src-1\"\n\
             ---\n"
        );
    }

    #[test]
    fn test_empty_tags_emit_empty_array() {
        let fm = FrontMatter::for_document(&record("Untagged", &[]), "untagged", "article");
        assert!(fm.to_yaml().contains("tags: []\n"));
    }

    #[test]
    fn test_title_quotes_are_escaped() {
        let fm = FrontMatter::for_document(&record("Say \"hi\"", &[]), "say-hi", "article");
        assert!(fm.to_yaml().contains("title: \"Say \\\"hi\\\"\"\n"));
    }

    #[test]
    fn test_date_falls_back_to_last_edited() {
        let mut rec = record("No Date", &[]);
        rec.date = None;
        let fm = FrontMatter::for_document(&rec, "no-date", "article");
        assert!(fm.to_yaml().contains("date: \"2026-02-04\"\n"));
    }
}
