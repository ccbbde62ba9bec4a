//! Centralized error types for the pump.fun indexer

use std::fmt;
use thiserror::Error;

/// Main indexer error type
#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Address derivation failed for mint {mint}")]
    AddressDerivation { mint: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Which event shape a payload was being decoded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Swap,
    Creation,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Swap => write!(f, "swap"),
            EventKind::Creation => write!(f, "creation"),
        }
    }
}

/// Errors raised while decoding self-invocation payloads
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed {event} payload: {reason}")]
    MalformedPayload { event: EventKind, reason: String },
}

impl DecodeError {
    pub fn malformed(event: EventKind, reason: impl Into<String>) -> Self {
        DecodeError::MalformedPayload {
            event,
            reason: reason.into(),
        }
    }
}

/// Storage-specific errors (persistence failures)
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            other => StorageError::Database(other.to_string()),
        }
    }
}

/// Network-specific errors (transport failures)
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Geyser stream error: {0}")]
    GeyserStream(String),

    #[error("Geyser stream closed by server")]
    StreamClosed,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Errors from the event pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{0} queue is closed")]
    Closed(EventKind),
}

/// Result type alias for indexer operations
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<sqlx::Error> for IndexerError {
    fn from(err: sqlx::Error) -> Self {
        IndexerError::Storage(StorageError::from(err))
    }
}
