//! Upstream fetching
//!
//! Talks to the paginated `skip`/`limit` endpoint, normalizes its several
//! known payload shapes, retries transient failures with exponential
//! backoff, and returns a flat document sequence. Ordinary transient
//! failures never surface as errors: paging stops and whatever was
//! collected so far is returned through [`FetchOutcome`].

mod client;
mod config;
mod error;
mod page;

pub use client::{FetchOutcome, MessageFetcher};
pub use config::FetcherConfig;
pub use error::{FetchError, FetchResult};
