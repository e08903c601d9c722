//! Message search service
//!
//! Ingests a dynamic document collection from a remote paginated source and
//! serves ranked full-text search over it:
//!
//! - [`fetch`] — resilient paginated client with retries, backoff, and
//!   terminal-error classification
//! - [`loader`] — one-shot and periodic refresh, atomic snapshot publication
//! - [`search`] — tokenizer, inverted index, and query/scoring/pagination
//! - [`api`] — axum HTTP surface (`/search`, `/health`, `/reload`)

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod search;

pub use config::Config;
pub use error::{AppError, Result};
pub use loader::DataLoader;
pub use search::{Document, SearchEngine};
