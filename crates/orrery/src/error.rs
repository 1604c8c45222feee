//! Error types for chart construction.
//!
//! Only two failures abort a render entirely: an unrecognized graph type in
//! the input document, and a datasource that cannot be read or parsed.
//! Everything else the engine encounters at interaction time (a selection
//! event for an id no trace knows about, an empty layout group) is local:
//! it is logged and treated as a no-op rather than surfaced as an error.

use thiserror::Error;

/// Result type for chart engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for chart construction.
#[derive(Debug, Error)]
pub enum Error {
    /// The document's `type` field is not a recognized graph type.
    /// The load is aborted and no partial chart is produced.
    #[error("unsupported graph type: {0}")]
    UnsupportedGraphType(String),

    /// The input datasource could not be read.
    #[error("datasource unavailable: {0}")]
    DataSourceUnavailable(#[from] std::io::Error),

    /// The input document could not be parsed as a graph document.
    #[error("invalid graph document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}
