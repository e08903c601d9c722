//! Resilient paginated fetcher for the upstream message feed

use crate::fetch::config::FetcherConfig;
use crate::fetch::error::{FetchError, FetchResult};
use crate::fetch::page::normalize_page;
use crate::search::Document;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Terminal result of one full fetch call.
///
/// A terminal condition always yields the documents already collected
/// rather than discarding them; only a shape error (reported through
/// [`FetchError::Shape`]) fails the whole call.
#[derive(Debug)]
pub enum FetchOutcome {
    /// All pages retrieved
    Complete(Vec<Document>),

    /// Upstream returned 401/403; paging stopped, collected pages kept
    AuthDenied { collected: Vec<Document> },

    /// A page exhausted its retry budget; collected pages kept
    RetriesExhausted { collected: Vec<Document> },
}

impl FetchOutcome {
    /// The best-effort document sequence, whatever the termination reason.
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            FetchOutcome::Complete(docs) => docs,
            FetchOutcome::AuthDenied { collected } => collected,
            FetchOutcome::RetriesExhausted { collected } => collected,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, FetchOutcome::Complete(_))
    }
}

/// A single page request failure, classified for the retry loop.
enum PageError {
    /// 401/403: terminal for the whole fetch, never retried
    Auth(u16),

    /// Network error, timeout, or any other HTTP error: retried with
    /// backoff within the page
    Transient(String),
}

/// Pages through the upstream `skip`/`limit` endpoint and reassembles the
/// flat document sequence.
pub struct MessageFetcher {
    client: Client,
    config: FetcherConfig,
}

impl MessageFetcher {
    pub fn new(config: FetcherConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::ClientInit(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetch the full document set, paging until done.
    ///
    /// With no `limit`, a one-item probe discovers the upstream-reported
    /// total and uses it as a single-page fetch size; if the probe fails
    /// the configured default chunk size is used instead. The fallback
    /// chunk is deliberately not bounded against the unknown total.
    pub async fn fetch_all(&self, limit: Option<usize>) -> FetchResult<FetchOutcome> {
        let chunk = match limit {
            Some(n) => n,
            None => match self.probe_total().await {
                Some(total) => {
                    debug!(total, "probe discovered upstream total");
                    total
                }
                None => {
                    debug!(
                        chunk = self.config.default_chunk_size,
                        "probe failed; falling back to default chunk size"
                    );
                    self.config.default_chunk_size
                }
            },
        };

        let mut collected: Vec<Document> = Vec::new();
        let mut seen = 0usize;
        let mut skip = 0usize;

        loop {
            let payload = match self.fetch_page_with_retries(skip, chunk).await {
                Ok(payload) => payload,
                Err(PageError::Auth(status)) => {
                    error!(
                        status,
                        skip,
                        limit = chunk,
                        "upstream denied access; stopping further paging"
                    );
                    return Ok(FetchOutcome::AuthDenied { collected });
                }
                Err(PageError::Transient(reason)) => {
                    error!(
                        skip,
                        attempts = self.config.max_retries,
                        reason,
                        "page retries exhausted; stopping further paging"
                    );
                    return Ok(FetchOutcome::RetriesExhausted { collected });
                }
            };

            let page = normalize_page(payload)?;
            if page.fetched == 0 {
                break;
            }

            // Paging arithmetic works on the raw entry count, not the
            // document count: dropped non-object entries still occupied
            // slots in the upstream page.
            let fetched = page.fetched;
            seen += fetched;
            collected.extend(page.items);

            // Upstream-reported total caps the fetch when present.
            if let Some(total) = page.total {
                if seen >= total {
                    break;
                }
            }

            // A short page means we are at the end.
            if fetched < chunk {
                break;
            }

            skip += chunk;
            tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
        }

        info!(documents = collected.len(), "fetch complete");
        Ok(FetchOutcome::Complete(collected))
    }

    /// One-item probe to discover the reported total. Any failure, or a
    /// payload without a positive `total`, yields `None`.
    async fn probe_total(&self) -> Option<usize> {
        let payload = self.request_page(0, 1).await.ok()?;
        match payload {
            Value::Object(map) => map
                .get("total")
                .and_then(Value::as_u64)
                .filter(|&n| n > 0)
                .map(|n| n as usize),
            _ => None,
        }
    }

    /// Attempt a page up to the retry budget, with exponential backoff
    /// between transient failures. Auth denials short-circuit immediately.
    async fn fetch_page_with_retries(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<Value, PageError> {
        let mut backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let mut last_error = String::new();

        for attempt in 1..=self.config.max_retries {
            match self.request_page(skip, limit).await {
                Ok(payload) => return Ok(payload),
                Err(PageError::Auth(status)) => return Err(PageError::Auth(status)),
                Err(PageError::Transient(reason)) => {
                    warn!(
                        attempt,
                        max_attempts = self.config.max_retries,
                        skip,
                        reason,
                        "transient error fetching page"
                    );
                    last_error = reason;
                }
            }

            if attempt < self.config.max_retries {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(PageError::Transient(last_error))
    }

    /// Single GET of one page, classified into auth vs transient failure.
    async fn request_page(&self, skip: usize, limit: usize) -> Result<Value, PageError> {
        let response = self
            .client
            .get(self.config.messages_url())
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await
            .map_err(|e| PageError::Transient(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(PageError::Auth(status.as_u16()));
        }
        if !status.is_success() {
            return Err(PageError::Transient(format!("HTTP status {status}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| PageError::Transient(format!("invalid JSON body: {e}")))
    }
}
