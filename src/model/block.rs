//! Content block model.
//!
//! A document body is a rooted ordered tree of typed blocks. The kind set
//! is closed; anything the source adds later arrives as `Unsupported` and
//! renders as a placeholder instead of failing the document.

use serde::{Deserialize, Serialize};

use crate::model::RichTextSpan;

/// One content block and its (possibly empty) ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block identifier assigned by the remote source.
    pub id: String,

    /// Typed payload.
    pub kind: BlockKind,

    /// Nested child blocks, in source order.
    pub children: Vec<Block>,
}

impl Block {
    #[must_use]
    pub fn new(id: &str, kind: BlockKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Number of blocks in this subtree, including self.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Block::subtree_len).sum::<usize>()
    }
}

/// The closed set of block payloads the converter understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Paragraph {
        text: Vec<RichTextSpan>,
    },
    /// Heading level 1-3 (the source caps at 3).
    Heading {
        level: u8,
        text: Vec<RichTextSpan>,
    },
    BulletedListItem {
        text: Vec<RichTextSpan>,
    },
    NumberedListItem {
        text: Vec<RichTextSpan>,
    },
    ToDo {
        text: Vec<RichTextSpan>,
        checked: bool,
    },
    Quote {
        text: Vec<RichTextSpan>,
    },
    Callout {
        text: Vec<RichTextSpan>,
        /// Emoji icon, when the callout has one.
        icon: Option<String>,
    },
    Toggle {
        text: Vec<RichTextSpan>,
    },
    Code {
        text: Vec<RichTextSpan>,
        language: String,
    },
    Image {
        url: String,
        caption: Vec<RichTextSpan>,
    },
    Divider,
    Table {
        has_column_header: bool,
    },
    TableRow {
        cells: Vec<Vec<RichTextSpan>>,
    },
    /// Any type outside the closed set; renders as a placeholder comment.
    Unsupported {
        kind: String,
    },
}

impl BlockKind {
    /// Whether this block renders as a list item (affects sibling
    /// separation and child indentation).
    #[must_use]
    pub const fn is_list_item(&self) -> bool {
        matches!(
            self,
            Self::BulletedListItem { .. } | Self::NumberedListItem { .. } | Self::ToDo { .. }
        )
    }
}
