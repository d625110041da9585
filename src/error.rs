//! Crate-wide error type and result alias.

use std::io;
use thiserror::Error;

/// Convenience alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors surfaced by the graph store, the transactor and the query engine.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The query target user does not exist. Surfaced to the caller, never retried.
    #[error("user `{0}` not found")]
    NotFound(String),
    /// A relationship event referenced a user absent from both the store and
    /// the current batch's registrations. Aborts the whole ingestion batch.
    #[error("relationship endpoint `{0}` does not exist")]
    MissingEndpoint(String),
    /// A malformed token, timestamp or non-positive pagination parameter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A batch mutation failed for a reason other than a missing endpoint.
    /// The batch is rolled back and dropped; redelivery is the caller's call.
    #[error("transaction failed: {0}")]
    TransactionFailure(String),
    /// I/O failure while reading or writing a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Snapshot encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
