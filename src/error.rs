use thiserror::Error;

/// Result type for blob operations
pub type BlobResult<T> = Result<T, BlobError>;

/// Result type for store adapter operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the blob layer
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Invalid blob key: {message}")]
    InvalidKey { message: String },

    #[error("Invalid request: {message}")]
    Invalid { message: String },

    #[error("Write session already failed and its state was discarded")]
    SessionFailed,

    #[error("Chunking invariant violated: {buffered} bytes buffered at finalize exceeds block size {block_size}")]
    InvariantViolation { buffered: usize, block_size: usize },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors raised by ordered-store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store not ready: {message}")]
    NotReady { message: String },

    #[error("Batch commit failed: {source}")]
    Commit {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Range scan failed: {source}")]
    Scan {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Store backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BlobError {
    /// Create an invalid key error
    pub fn invalid_key<S: Into<String>>(message: S) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

impl StoreError {
    /// Create a not ready error
    pub fn not_ready<S: Into<String>>(message: S) -> Self {
        Self::NotReady {
            message: message.into(),
        }
    }

    /// Create a commit error from any error type
    pub fn commit<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Commit {
            source: Box::new(error),
        }
    }

    /// Create a scan error from any error type
    pub fn scan<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Scan {
            source: Box::new(error),
        }
    }

    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }
}
