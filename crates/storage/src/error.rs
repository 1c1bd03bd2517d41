/// All errors that can be returned by a BattleStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded for storage.
    #[error("failed to encode battle record: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored line could not be decoded back into a record.
    #[error("corrupt battle record at line {line}: {message}")]
    Corrupt { line: usize, message: String },

    /// A backend-specific storage error (task join failure, connection loss, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
