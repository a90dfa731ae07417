//! Pure conversion from fetched documents to publishable files.
//!
//! Everything in this module is deterministic: the same metadata and
//! block tree always produce byte-identical output. All I/O lives in
//! `notion` (fetching) and `sync` (writing).

pub mod front_matter;
pub mod markdown;
pub mod richtext;
pub mod slug;

pub use front_matter::FrontMatter;
pub use markdown::render_blocks;
pub use richtext::render_spans;
pub use slug::{assign_slugs, document_slug, slugify};

use crate::model::{Block, DocumentRecord};

/// A document rendered to the exact text written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub source_id: String,
    pub slug: String,
    /// Full file text: header, blank line, body, one trailing newline.
    pub file_text: String,
}

impl RenderedDocument {
    /// Assemble front matter and body into the final file text.
    #[must_use]
    pub fn assemble(
        record: &DocumentRecord,
        slug: &str,
        layout: &str,
        blocks: &[Block],
    ) -> Self {
        let header = FrontMatter::for_document(record, slug, layout).to_yaml();
        let body = render_blocks(blocks);
        let body = body.trim_end();

        let file_text = if body.is_empty() {
            header
        } else {
            format!("{header}\n{body}\n")
        };

        Self {
            source_id: record.source_id.clone(),
            slug: slug.to_string(),
            file_text,
        }
    }
}
