//! Error types for upstream fetching

/// Result type for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Errors that fail a fetch call outright.
///
/// Auth denials and exhausted retries are *not* errors at this level: they
/// terminate paging but keep the documents already collected, and are
/// reported through [`FetchOutcome`](crate::fetch::FetchOutcome).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientInit(String),

    /// The response payload matched none of the known page shapes
    #[error("Unexpected response shape from messages endpoint: {0}")]
    Shape(String),
}
