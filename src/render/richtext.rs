//! Rich text to Markdown rendering.
//!
//! Spans concatenate; each span is wrapped innermost-to-outermost in a
//! fixed order: code, bold, italic, strikethrough, underline, link. Code
//! span content is verbatim; all other prose is escaped so upstream text
//! cannot inject Markdown syntax.

use crate::model::RichTextSpan;

/// Render a rich text value (ordered spans) to inline Markdown.
#[must_use]
pub fn render_spans(spans: &[RichTextSpan]) -> String {
    spans.iter().map(render_span).collect()
}

/// Concatenated plain text of the spans, no escaping or annotations.
#[must_use]
pub fn plain_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

fn render_span(span: &RichTextSpan) -> String {
    // Empty spans render as nothing: no orphaned markers.
    if span.is_empty() {
        return String::new();
    }

    let mut text = if span.code {
        code_span(&span.text)
    } else {
        escape_markdown(&span.text)
    };

    if span.bold {
        text = format!("**{text}**");
    }
    if span.italic {
        text = format!("*{text}*");
    }
    if span.strikethrough {
        text = format!("~~{text}~~");
    }
    if span.underline {
        text = format!("<u>{text}</u>");
    }
    if let Some(href) = &span.href {
        text = format!("[{text}]({href})");
    }

    text
}

/// Inline code span. The delimiter outgrows any backtick run in the
/// content, with space padding when the content starts or ends with one.
fn code_span(text: &str) -> String {
    let delim = "`".repeat(longest_backtick_run(text) + 1);
    if text.starts_with('`') || text.ends_with('`') {
        format!("{delim} {text} {delim}")
    } else {
        format!("{delim}{text}{delim}")
    }
}

/// Longest run of consecutive backticks in `text`.
pub(crate) fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Escape Markdown-significant characters in prose.
///
/// Backslash-escapes inline syntax characters everywhere, then
/// neutralizes list markers and ordinals at line starts (those only
/// trigger in the first column).
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '#') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
        .split('\n')
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line_start(line: &str) -> String {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    if let Some(rest) = trimmed.strip_prefix('-') {
        return format!("{indent}\\-{rest}");
    }
    if let Some(rest) = trimmed.strip_prefix('+') {
        return format!("{indent}\\+{rest}");
    }

    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    if !digits.is_empty() {
        let after = &trimmed[digits.len()..];
        if let Some(rest) = after.strip_prefix('.') {
            return format!("{indent}{digits}\\.{rest}");
        }
        if let Some(rest) = after.strip_prefix(')') {
            return format!("{indent}{digits}\\){rest}");
        }
    }

    line.to_string()
}
