//! Authenticated Notion REST client.
//!
//! Pins the API version, carries the bearer credential on every request,
//! and retries transient failures (connect errors, timeouts, 429, 5xx)
//! per the configured [`RetryPolicy`]. Everything here is read-only.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::model::DocumentRecord;
use crate::notion::wire::{ChildrenPage, CursorPage, DatabaseResponse, QueryRequest};
use crate::notion::{wire, DocumentSource, RetryPolicy};

const DEFAULT_BASE_URL: &str = "https://api.notion.com";
const NOTION_VERSION: &str = "2025-09-03";
const PAGE_SIZE: u32 = 100;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client bound to one resolved data source.
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    data_source_id: String,
    status_property: String,
    retry: RetryPolicy,
}

impl NotionClient {
    /// Build a client and resolve the data source to query.
    ///
    /// An explicit `data_source_id` wins; otherwise the data source is
    /// discovered from `database_id` metadata. Discovery fails when the
    /// database has no data source, or more than one (pass
    /// `--data-source-id` to disambiguate).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for credential or id problems and
    /// [`Error::Fetch`] when discovery itself fails.
    pub async fn connect(
        token: &str,
        data_source_id: Option<&str>,
        database_id: Option<&str>,
        status_property: &str,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let mut client = Self::with_base_url(DEFAULT_BASE_URL, token, status_property, retry)?;

        client.data_source_id = match (data_source_id, database_id) {
            (Some(id), _) => id.to_string(),
            (None, Some(db_id)) => client.discover_data_source(db_id).await?,
            (None, None) => {
                return Err(Error::Config(
                    "no data source configured: set a data source id or a database id".to_string(),
                ));
            }
        };

        Ok(client)
    }

    /// Client against a custom endpoint, with the data source still
    /// unresolved. Primarily for testing.
    pub fn with_base_url(
        base_url: &str,
        token: &str,
        status_property: &str,
        retry: RetryPolicy,
    ) -> Result<Self> {
        if token.is_empty() {
            return Err(Error::Config("missing API credential (token)".to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::Config("credential contains invalid characters".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            data_source_id: String::new(),
            status_property: status_property.to_string(),
            retry,
        })
    }

    /// The data source this client queries.
    #[must_use]
    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    /// Resolve the single data source under a database.
    async fn discover_data_source(&self, database_id: &str) -> Result<String> {
        let url = format!("{}/v1/databases/{database_id}", self.base_url);
        let response = self.send_with_retry(|| self.http.get(&url)).await?;
        let database: DatabaseResponse = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("failed to parse database metadata: {e}")))?;

        match database.data_sources.as_slice() {
            [] => Err(Error::Config(format!(
                "database {database_id} has no data sources"
            ))),
            [only] => {
                tracing::info!(
                    data_source = %only.id,
                    name = %only.name,
                    "resolved data source from database"
                );
                Ok(only.id.clone())
            }
            many => Err(Error::MultipleDataSources {
                database_id: database_id.to_string(),
                candidates: many
                    .iter()
                    .map(|ds| (ds.id.clone(), ds.name.clone()))
                    .collect(),
            }),
        }
    }

    /// Send a request, retrying transient failures with backoff.
    ///
    /// Retries connect errors, timeouts, 429 and 5xx responses. A 429's
    /// `Retry-After` overrides the computed backoff. Any other non-2xx
    /// response fails immediately.
    async fn send_with_retry(
        &self,
        make: impl Fn() -> reqwest::RequestBuilder + Send + Sync,
    ) -> Result<reqwest::Response> {
        let mut attempt: u32 = 1;

        loop {
            let failure = match make().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                        let retry_after = retry_after_delay(&response);
                        let body = response.text().await.unwrap_or_default();
                        Transient {
                            reason: format!("{status}: {}", snippet(&body)),
                            retry_after,
                        }
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::Fetch(format!("{status}: {}", snippet(&body))));
                    }
                }
                Err(e) if e.is_connect() || e.is_timeout() => Transient {
                    reason: e.to_string(),
                    retry_after: None,
                },
                Err(e) => return Err(Error::Fetch(e.to_string())),
            };

            if !self.retry.should_retry(attempt) {
                return Err(Error::Fetch(format!(
                    "{} (after {attempt} attempts)",
                    failure.reason
                )));
            }

            let delay = failure
                .retry_after
                .unwrap_or_else(|| self.retry.delay_after(attempt));
            tracing::warn!(
                attempt,
                delay_ms = delay.as_millis(),
                reason = %failure.reason,
                "transient fetch failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// A failure worth retrying, with the server-requested delay if any.
struct Transient {
    reason: String,
    retry_after: Option<Duration>,
}

fn retry_after_delay(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// First line of an error body, truncated for logs.
fn snippet(body: &str) -> &str {
    let line = body.lines().next().unwrap_or_default();
    match line.char_indices().nth(200) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

impl DocumentSource for NotionClient {
    async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let url = format!(
            "{}/v1/data_sources/{}/query",
            self.base_url, self.data_source_id
        );

        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let body = QueryRequest {
                page_size: PAGE_SIZE,
                start_cursor: cursor.as_deref(),
            };
            let response = self
                .send_with_retry(|| self.http.post(&url).json(&body))
                .await?;
            let page: CursorPage = response
                .json()
                .await
                .map_err(|e| Error::Fetch(format!("failed to parse listing: {e}")))?;

            for entry in &page.results {
                match wire::parse_document(entry, &self.status_property) {
                    Some(record) => records.push(record),
                    None => tracing::warn!("skipping listing entry without an id"),
                }
            }

            if page.has_more {
                cursor = page.next_cursor;
                if cursor.is_none() {
                    return Err(Error::Fetch(
                        "listing claims more results but sent no cursor".to_string(),
                    ));
                }
            } else {
                break;
            }
        }

        tracing::debug!(count = records.len(), "listed documents");
        Ok(records)
    }

    async fn block_children(&self, parent_id: &str, cursor: Option<&str>) -> Result<ChildrenPage> {
        let url = format!("{}/v1/blocks/{parent_id}/children", self.base_url);

        let response = self
            .send_with_retry(|| {
                let request = self
                    .http
                    .get(&url)
                    .query(&[("page_size", PAGE_SIZE.to_string())]);
                match cursor {
                    Some(c) => request.query(&[("start_cursor", c)]),
                    None => request,
                }
            })
            .await?;

        let page: CursorPage = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("failed to parse block children: {e}")))?;

        let mut blocks = Vec::with_capacity(page.results.len());
        for entry in &page.results {
            match wire::parse_block(entry) {
                Some(block) => blocks.push(block),
                None => tracing::warn!(parent = %parent_id, "skipping block without id or type"),
            }
        }

        Ok(ChildrenPage {
            blocks,
            next_cursor: if page.has_more { page.next_cursor } else { None },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url_rejects_empty_token() {
        let result = NotionClient::with_base_url(
            "https://api.example.com",
            "",
            "Status",
            RetryPolicy::default(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let client = NotionClient::with_base_url(
            "https://api.example.com/",
            "secret-token",
            "Status",
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }

    #[test]
    fn test_snippet_truncates_to_first_line() {
        assert_eq!(snippet("first\nsecond"), "first");
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).len(), 200);
    }
}
