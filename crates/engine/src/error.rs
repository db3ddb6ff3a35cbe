use thiserror::Error;

/// The public error type for every [`crate::Engine`] operation.
///
/// `NotFound` is deliberately not a variant here: an absent key is the
/// ordinary result of [`crate::Engine::get`], represented as `Ok(None)`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A malformed key or value (empty key, oversized key/value).
    #[error("invalid argument: {0}")]
    Argument(String),

    /// An underlying I/O failure not already wrapped by [`sstable::SSTableError`].
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A segment write or read failed: I/O, truncation, or checksum mismatch.
    #[error("storage error: {0}")]
    Storage(#[from] sstable::SSTableError),

    /// The engine was used after [`crate::Engine::close`].
    #[error("engine is closed")]
    Closed,

    /// A background compaction failed and the engine now only serves reads,
    /// until it is reopened.
    #[error("engine is in a degraded read-only state after a compaction failure")]
    Degraded,
}
