use gog_types::ObjectKind;

/// Errors from encoding and decoding objects.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The `"<kind> <len>\0"` header could not be parsed.
    #[error("malformed object header: {0}")]
    MalformedHeader(String),

    /// The stored kind differs from the kind the caller asked for.
    #[error("object type mismatch: expected {expected}, found {actual}")]
    KindMismatch { expected: ObjectKind, actual: String },

    /// The header length does not match the payload that follows it.
    #[error("object length mismatch: header declares {declared} bytes, payload has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// The kind is known but has no object implementation.
    #[error("unsupported object type: {0}")]
    UnsupportedKind(ObjectKind),

    /// Commit-style key-value data could not be parsed.
    #[error("malformed kvlm at byte {offset}: {reason}")]
    MalformedKvlm { offset: usize, reason: String },

    /// The stored bytes are not a valid zlib stream.
    #[error("failed to decompress object: {0}")]
    Decompress(#[source] std::io::Error),

    /// I/O error while compressing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
