//! Block tree to Markdown conversion.
//!
//! Pure and total: rendering is a function of the tree alone, and every
//! block kind renders to something (unknown kinds become a placeholder
//! comment). Structural problems are caught upstream at load time, so
//! the tree here is acyclic by construction.

use crate::model::{Block, BlockKind, RichTextSpan};
use crate::render::richtext::{longest_backtick_run, plain_text, render_spans};

/// Render a document's block tree to its Markdown body.
///
/// Consecutive list items join with single newlines (tight lists); every
/// other block boundary gets a blank line.
#[must_use]
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut prev_was_list = false;
    let mut ordinal = 0usize;

    for block in blocks {
        ordinal = if matches!(block.kind, BlockKind::NumberedListItem { .. }) {
            ordinal + 1
        } else {
            0
        };

        let md = render_block(block, ordinal);
        if md.is_empty() {
            continue;
        }

        let is_list = block.kind.is_list_item();
        if !out.is_empty() {
            out.push_str(if prev_was_list && is_list { "\n" } else { "\n\n" });
        }
        out.push_str(&md);
        prev_was_list = is_list;
    }

    out
}

fn render_block(block: &Block, ordinal: usize) -> String {
    match &block.kind {
        // Children of paragraphs and headings continue at the same level.
        BlockKind::Paragraph { text } => follow_with_children(render_spans(text), &block.children),
        BlockKind::Heading { level, text } => {
            let own = format!("{} {}", "#".repeat(usize::from(*level)), render_spans(text));
            follow_with_children(own, &block.children)
        }

        BlockKind::BulletedListItem { text } => list_item("- ", text, &block.children),
        BlockKind::NumberedListItem { text } => {
            list_item(&format!("{ordinal}. "), text, &block.children)
        }
        BlockKind::ToDo { text, checked } => {
            let marker = if *checked { "- [x] " } else { "- [ ] " };
            // Continuation indent is the bullet width; the checkbox is content.
            let line = format!("{marker}{}", render_spans(text));
            with_indented_children(line, 2, &block.children)
        }

        BlockKind::Quote { text } => quoted(&render_spans(text), &block.children),
        BlockKind::Callout { text, icon } => {
            let rendered = render_spans(text);
            let own = match icon {
                Some(emoji) => format!("{emoji} {rendered}"),
                None => rendered,
            };
            quoted(&own, &block.children)
        }

        BlockKind::Toggle { text } => {
            let summary = render_spans(text);
            if block.children.is_empty() {
                format!("<details>\n<summary>{summary}</summary>\n</details>")
            } else {
                format!(
                    "<details>\n<summary>{summary}</summary>\n\n{}\n\n</details>",
                    render_blocks(&block.children)
                )
            }
        }

        BlockKind::Code { text, language } => {
            let content = plain_text(text);
            let content = content.trim_end_matches('\n');
            let fence = "`".repeat((longest_backtick_run(content) + 1).max(3));
            format!("{fence}{language}\n{content}\n{fence}")
        }

        BlockKind::Image { url, caption } => {
            let alt = render_spans(caption);
            let alt = if alt.is_empty() { "image" } else { &alt };
            format!("![{alt}]({url})")
        }

        BlockKind::Divider => "---".to_string(),

        BlockKind::Table { has_column_header } => render_table(block, *has_column_header),
        BlockKind::TableRow { cells } => {
            // Orphan row outside a table still renders as one line.
            let cells: Vec<String> = cells
                .iter()
                .map(|cell| escape_table_cell(&render_spans(cell)))
                .collect();
            format!("| {} |", cells.join(" | "))
        }

        BlockKind::Unsupported { kind } => format!("<!-- Unsupported block type: {kind} -->"),
    }
}

/// List item: marker + text, children indented by the marker width so
/// nested lists parse as children of this item.
fn list_item(marker: &str, text: &[RichTextSpan], children: &[Block]) -> String {
    let line = format!("{marker}{}", render_spans(text));
    with_indented_children(line, marker.len(), children)
}

fn with_indented_children(line: String, indent: usize, children: &[Block]) -> String {
    if children.is_empty() {
        return line;
    }
    let child_md = render_blocks(children);
    if child_md.is_empty() {
        return line;
    }
    format!("{line}\n{}", indent_lines(&child_md, &" ".repeat(indent)))
}

fn follow_with_children(own: String, children: &[Block]) -> String {
    if children.is_empty() {
        return own;
    }
    let child_md = render_blocks(children);
    if child_md.is_empty() {
        own
    } else if own.is_empty() {
        child_md
    } else {
        format!("{own}\n\n{child_md}")
    }
}

/// Quote body: own text, then rendered children, every line prefixed with
/// `> ` (bare `>` on blank lines).
fn quoted(own: &str, children: &[Block]) -> String {
    let mut content = own.to_string();
    if !children.is_empty() {
        let child_md = render_blocks(children);
        if !child_md.is_empty() {
            if content.is_empty() {
                content = child_md;
            } else {
                content = format!("{content}\n\n{child_md}");
            }
        }
    }

    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_lines(text: &str, indent: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

/// Markdown pipe table. The first row is the header when the source marks
/// one; otherwise the header row stays empty rather than inventing
/// column labels.
fn render_table(block: &Block, has_column_header: bool) -> String {
    let rows: Vec<Vec<String>> = block
        .children
        .iter()
        .filter_map(|child| match &child.kind {
            BlockKind::TableRow { cells } => Some(
                cells
                    .iter()
                    .map(|cell| escape_table_cell(&render_spans(cell)))
                    .collect(),
            ),
            _ => None,
        })
        .collect();

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return "<table></table>".to_string();
    }

    let mut normalized = rows;
    for row in &mut normalized {
        row.resize(width, String::new());
    }

    let (header, data_rows) = if has_column_header {
        let mut iter = normalized.into_iter();
        let header = iter.next().unwrap_or_else(|| vec![String::new(); width]);
        (header, iter.collect::<Vec<_>>())
    } else {
        (vec![String::new(); width], normalized)
    };

    let mut lines = vec![
        format!("| {} |", header.join(" | ")),
        format!("| {} |", vec!["---"; width].join(" | ")),
    ];
    for row in data_rows {
        lines.push(format!("| {} |", row.join(" | ")));
    }

    lines.join("\n")
}
