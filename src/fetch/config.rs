//! Fetcher configuration

use serde::{Deserialize, Serialize};

/// Configuration for the upstream paginated source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Root URL of the upstream service
    pub base_url: String,

    /// Path of the paginated listing endpoint
    #[serde(default = "default_messages_path")]
    pub messages_path: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Page size used when total discovery fails
    #[serde(default = "default_chunk_size")]
    pub default_chunk_size: usize,

    /// Attempts per page before the fetch degrades to partial results
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial retry backoff (milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Inter-page politeness pause (milliseconds)
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            messages_path: default_messages_path(),
            request_timeout_secs: default_request_timeout(),
            default_chunk_size: default_chunk_size(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

impl FetcherConfig {
    /// Full URL of the listing endpoint.
    pub fn messages_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.messages_path
        )
    }
}

fn default_messages_path() -> String {
    "/messages/".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_chunk_size() -> usize {
    100
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    200
}

fn default_page_delay_ms() -> u64 {
    50
}
