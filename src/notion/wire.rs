//! Wire format for the remote document API.
//!
//! Pagination envelopes are typed; page and block payloads are decoded
//! tolerantly from raw JSON so unknown block types or missing properties
//! degrade to defaults instead of failing a whole listing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Block, BlockKind, DocumentRecord, RichTextSpan};

/// Cursor-paginated envelope shared by the query and children endpoints.
#[derive(Debug, Deserialize)]
pub struct CursorPage {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Body for the data source query endpoint.
#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

/// Database metadata, used only for data source discovery.
#[derive(Debug, Deserialize)]
pub struct DatabaseResponse {
    #[serde(default)]
    pub data_sources: Vec<DataSourceRef>,
}

#[derive(Debug, Deserialize)]
pub struct DataSourceRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// One fetched block, before its own children are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBlock {
    /// Parsed block with empty `children`.
    pub block: Block,
    /// Whether the source says this block has children to fetch.
    pub has_children: bool,
}

/// One page of children for a parent block.
#[derive(Debug)]
pub struct ChildrenPage {
    pub blocks: Vec<FetchedBlock>,
    /// Cursor for the next page, when the source has more.
    pub next_cursor: Option<String>,
}

/// Decode one page object from a listing query.
///
/// Returns `None` when the entry has no id; every other field defaults.
/// `status_property` names the page property holding the publish status.
#[must_use]
pub fn parse_document(page: &Value, status_property: &str) -> Option<DocumentRecord> {
    let source_id = page["id"].as_str()?.to_string();
    let properties = &page["properties"];

    let title = title_property(properties);
    let status = named_option(&properties[status_property]);
    let tags = properties["Tags"]["multi_select"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();
    let date = properties["Date"]["date"]["start"]
        .as_str()
        .and_then(parse_date);

    let last_edited_time = page["last_edited_time"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or(DateTime::<Utc>::UNIX_EPOCH, |dt| dt.with_timezone(&Utc));

    let archived =
        page["archived"].as_bool().unwrap_or(false) || page["in_trash"].as_bool().unwrap_or(false);

    Some(DocumentRecord {
        source_id,
        title,
        status,
        tags,
        date,
        last_edited_time,
        archived,
    })
}

/// Plain text of the title property, located by `type == "title"` rather
/// than by name (the title column can be renamed upstream).
fn title_property(properties: &Value) -> String {
    properties
        .as_object()
        .and_then(|props| {
            props
                .values()
                .find(|p| p["type"].as_str() == Some("title"))
                .and_then(|p| p["title"].as_array())
        })
        .map(|spans| {
            spans
                .iter()
                .filter_map(|s| s["plain_text"].as_str())
                .collect()
        })
        .unwrap_or_default()
}

/// Name of a `status` or `select` property value.
fn named_option(property: &Value) -> Option<String> {
    property["status"]["name"]
        .as_str()
        .or_else(|| property["select"]["name"].as_str())
        .map(String::from)
}

/// Dates arrive as `YYYY-MM-DD` or a full timestamp; only the date part
/// matters here.
fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()
}

/// Decode one block object from a children listing.
///
/// Returns `None` when the entry has no id or type. Unknown types decode
/// as `Unsupported` so they still render a placeholder.
#[must_use]
pub fn parse_block(value: &Value) -> Option<FetchedBlock> {
    let id = value["id"].as_str()?;
    let block_type = value["type"].as_str()?;
    let data = &value[block_type];

    let kind = match block_type {
        "paragraph" => BlockKind::Paragraph {
            text: parse_rich_text(&data["rich_text"]),
        },
        "heading_1" | "heading_2" | "heading_3" => BlockKind::Heading {
            level: match block_type {
                "heading_1" => 1,
                "heading_2" => 2,
                _ => 3,
            },
            text: parse_rich_text(&data["rich_text"]),
        },
        "bulleted_list_item" => BlockKind::BulletedListItem {
            text: parse_rich_text(&data["rich_text"]),
        },
        "numbered_list_item" => BlockKind::NumberedListItem {
            text: parse_rich_text(&data["rich_text"]),
        },
        "to_do" => BlockKind::ToDo {
            text: parse_rich_text(&data["rich_text"]),
            checked: data["checked"].as_bool().unwrap_or(false),
        },
        "quote" => BlockKind::Quote {
            text: parse_rich_text(&data["rich_text"]),
        },
        "callout" => BlockKind::Callout {
            text: parse_rich_text(&data["rich_text"]),
            icon: data["icon"]["emoji"].as_str().map(String::from),
        },
        "toggle" => BlockKind::Toggle {
            text: parse_rich_text(&data["rich_text"]),
        },
        "code" => BlockKind::Code {
            text: parse_rich_text(&data["rich_text"]),
            language: data["language"].as_str().unwrap_or_default().to_string(),
        },
        "image" => BlockKind::Image {
            url: image_url(data),
            caption: parse_rich_text(&data["caption"]),
        },
        "divider" => BlockKind::Divider,
        "table" => BlockKind::Table {
            has_column_header: data["has_column_header"].as_bool().unwrap_or(false),
        },
        "table_row" => BlockKind::TableRow {
            cells: data["cells"]
                .as_array()
                .map(|rows| rows.iter().map(parse_rich_text).collect())
                .unwrap_or_default(),
        },
        other => BlockKind::Unsupported {
            kind: other.to_string(),
        },
    };

    Some(FetchedBlock {
        block: Block::new(id, kind),
        has_children: value["has_children"].as_bool().unwrap_or(false),
    })
}

/// Externally hosted and source-hosted images carry the URL under
/// different keys.
fn image_url(data: &Value) -> String {
    let url = match data["type"].as_str() {
        Some("external") => data["external"]["url"].as_str(),
        _ => data["file"]["url"].as_str(),
    };
    url.unwrap_or_default().to_string()
}

fn parse_rich_text(value: &Value) -> Vec<RichTextSpan> {
    value
        .as_array()
        .map(|spans| spans.iter().map(parse_span).collect())
        .unwrap_or_default()
}

fn parse_span(value: &Value) -> RichTextSpan {
    let annotations = &value["annotations"];
    RichTextSpan {
        text: value["plain_text"].as_str().unwrap_or_default().to_string(),
        bold: annotations["bold"].as_bool().unwrap_or(false),
        italic: annotations["italic"].as_bool().unwrap_or(false),
        code: annotations["code"].as_bool().unwrap_or(false),
        strikethrough: annotations["strikethrough"].as_bool().unwrap_or(false),
        underline: annotations["underline"].as_bool().unwrap_or(false),
        href: value["href"].as_str().map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document_full_page() {
        let page = json!({
            "id": "page-1",
            "last_edited_time": "2026-03-14T09:26:53.000Z",
            "archived": false,
            "properties": {
                "Name": {
                    "type": "title",
                    "title": [{"plain_text": "Creatine "}, {"plain_text": "Basics"}]
                },
                "Status": {
                    "type": "status",
                    "status": {"name": "Done"}
                },
                "Tags": {
                    "type": "multi_select",
                    "multi_select": [{"name": "health"}, {"name": "reference"}]
                },
                "Date": {
                    "type": "date",
                    "date": {"start": "2026-03-01"}
                }
            }
        });

        let record = parse_document(&page, "Status").unwrap();
        assert_eq!(record.source_id, "page-1");
        assert_eq!(record.title, "Creatine Basics");
        assert_eq!(record.status.as_deref(), Some("Done"));
        assert_eq!(record.tags, vec!["health", "reference"]);
        assert_eq!(record.date, Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(!record.archived);
    }

    #[test]
    fn test_parse_document_title_found_by_type_not_name() {
        let page = json!({
            "id": "page-2",
            "properties": {
                "Article": {
                    "type": "title",
                    "title": [{"plain_text": "Renamed Column"}]
                }
            }
        });

        let record = parse_document(&page, "Status").unwrap();
        assert_eq!(record.title, "Renamed Column");
        assert_eq!(record.status, None);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_parse_document_select_status() {
        let page = json!({
            "id": "page-3",
            "properties": {
                "Stage": {
                    "type": "select",
                    "select": {"name": "Completed"}
                }
            }
        });

        let record = parse_document(&page, "Stage").unwrap();
        assert_eq!(record.status.as_deref(), Some("Completed"));
    }

    #[test]
    fn test_parse_document_without_id_is_skipped() {
        assert!(parse_document(&json!({"properties": {}}), "Status").is_none());
    }

    #[test]
    fn test_parse_document_datetime_start() {
        let page = json!({
            "id": "page-4",
            "properties": {
                "Date": {"type": "date", "date": {"start": "2026-05-06T10:00:00.000+02:00"}}
            }
        });

        let record = parse_document(&page, "Status").unwrap();
        assert_eq!(record.date, Some(NaiveDate::from_ymd_opt(2026, 5, 6).unwrap()));
    }

    #[test]
    fn test_parse_document_in_trash_counts_as_archived() {
        let page = json!({"id": "page-5", "in_trash": true, "properties": {}});
        assert!(parse_document(&page, "Status").unwrap().archived);
    }

    #[test]
    fn test_parse_block_paragraph_with_annotations() {
        let value = json!({
            "id": "blk-1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {
                "rich_text": [{
                    "plain_text": "strong",
                    "href": null,
                    "annotations": {"bold": true, "italic": false}
                }]
            }
        });

        let fetched = parse_block(&value).unwrap();
        assert!(!fetched.has_children);
        match &fetched.block.kind {
            BlockKind::Paragraph { text } => {
                assert_eq!(text.len(), 1);
                assert_eq!(text[0].text, "strong");
                assert!(text[0].bold);
                assert!(!text[0].italic);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_block_heading_levels() {
        for (block_type, level) in [("heading_1", 1), ("heading_2", 2), ("heading_3", 3)] {
            let value = json!({
                "id": "blk",
                "type": block_type,
                block_type: {"rich_text": [{"plain_text": "H"}]}
            });
            match parse_block(&value).unwrap().block.kind {
                BlockKind::Heading { level: l, .. } => assert_eq!(l, level),
                other => panic!("expected heading, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_block_external_and_file_images() {
        let external = json!({
            "id": "img-1",
            "type": "image",
            "image": {
                "type": "external",
                "external": {"url": "https://example.com/x.png"},
                "caption": []
            }
        });
        match parse_block(&external).unwrap().block.kind {
            BlockKind::Image { url, .. } => assert_eq!(url, "https://example.com/x.png"),
            other => panic!("expected image, got {other:?}"),
        }

        let hosted = json!({
            "id": "img-2",
            "type": "image",
            "image": {
                "type": "file",
                "file": {"url": "https://files.example.com/y.png"},
                "caption": []
            }
        });
        match parse_block(&hosted).unwrap().block.kind {
            BlockKind::Image { url, .. } => assert_eq!(url, "https://files.example.com/y.png"),
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_block_table_row_cells() {
        let value = json!({
            "id": "row-1",
            "type": "table_row",
            "table_row": {
                "cells": [
                    [{"plain_text": "a"}],
                    [{"plain_text": "b"}, {"plain_text": "c"}]
                ]
            }
        });

        match parse_block(&value).unwrap().block.kind {
            BlockKind::TableRow { cells } => {
                assert_eq!(cells.len(), 2);
                assert_eq!(cells[1][1].text, "c");
            }
            other => panic!("expected table row, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_block_unknown_type_is_unsupported() {
        let value = json!({"id": "blk", "type": "synced_block", "synced_block": {}});
        match parse_block(&value).unwrap().block.kind {
            BlockKind::Unsupported { kind } => assert_eq!(kind, "synced_block"),
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_block_without_type_is_skipped() {
        assert!(parse_block(&json!({"id": "blk"})).is_none());
    }

    #[test]
    fn test_cursor_page_defaults() {
        let page: CursorPage = serde_json::from_value(json!({"results": []})).unwrap();
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn test_query_request_omits_absent_cursor() {
        let body = serde_json::to_string(&QueryRequest {
            page_size: 100,
            start_cursor: None,
        })
        .unwrap();
        assert_eq!(body, "{\"page_size\":100}");

        let body = serde_json::to_string(&QueryRequest {
            page_size: 100,
            start_cursor: Some("abc"),
        })
        .unwrap();
        assert!(body.contains("\"start_cursor\":\"abc\""));
    }
}
