use thiserror::Error;

/// Errors that can occur while encoding, decoding, or publishing artifacts.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("invalid artifact magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    /// The artifact carries a format-version tag this build does not know.
    /// No best-effort parsing: unknown layouts are rejected outright.
    #[error("unsupported artifact format version: {0}")]
    UnsupportedVersion(u32),

    #[error("artifact checksum mismatch")]
    ChecksumMismatch,

    #[error("corrupt artifact at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    #[error("compression failed: {0}")]
    CompressionFailed(String),

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for pack results.
pub type PackResult<T> = Result<T, PackError>;
