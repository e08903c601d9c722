//! In-memory full-text search over the message feed
//!
//! The engine is intentionally simple but fast for moderate-sized
//! datasets:
//!
//! - **Tokenizer**: lowercase, alphanumeric runs only
//! - **Inverted index**: token to document-id set, rebuilt from scratch on
//!   every refresh and published atomically as a [`Snapshot`]
//! - **Query strategies**: exact identifier match, empty-query listing, or
//!   token-union scoring with a substring fallback
//!
//! Searches always read the latest published snapshot and never observe a
//! partially-built index.

mod config;
mod document;
mod index;
mod query;
mod service;

pub use config::IndexOptions;
pub use document::Document;
pub use index::Snapshot;
pub use query::{is_identifier_query, tokenize};
pub use service::{SearchEngine, SearchResults};
