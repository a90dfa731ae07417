//! Rich text model.
//!
//! A rich text value is an ordered list of spans; each span carries its
//! own annotation flags and optional link target.

use serde::{Deserialize, Serialize};

/// One annotated run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextSpan {
    /// Plain text content of the run.
    pub text: String,

    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub underline: bool,

    /// Link target, if the run is a link.
    pub href: Option<String>,
}

impl RichTextSpan {
    /// A span with no annotations.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub fn code(mut self) -> Self {
        self.code = true;
        self
    }

    #[must_use]
    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    #[must_use]
    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    #[must_use]
    pub fn link(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    /// Whether the span has no visible content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_span_has_no_annotations() {
        let span = RichTextSpan::plain("hello");
        assert_eq!(span.text, "hello");
        assert!(!span.bold && !span.italic && !span.code);
        assert!(span.href.is_none());
    }

    #[test]
    fn test_builders_compose() {
        let span = RichTextSpan::plain("x").bold().italic().link("https://example.com");
        assert!(span.bold);
        assert!(span.italic);
        assert_eq!(span.href.as_deref(), Some("https://example.com"));
    }
}
