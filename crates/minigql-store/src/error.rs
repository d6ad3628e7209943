use minigql_types::RecordKey;

/// Errors from record store and collection operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with this key is already present.
    #[error("duplicate record key: {0}")]
    DuplicateKey(RecordKey),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from a file-backed collection.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the store lock.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
