//! Error types for cache operations.

/// Broad classification of a [`CacheError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The cache (or a level being added to it) is misconfigured.
    Configuration,
    /// A level index did not refer to an existing level.
    Index,
}

/// Errors that can occur during cache operations.
///
/// Every error is recoverable: an operation that fails leaves the cache
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The eviction policy identifier is not recognized.
    #[error("invalid eviction policy: {0}")]
    InvalidPolicy(String),

    /// A level was requested with zero capacity.
    #[error("level capacity must be positive")]
    ZeroCapacity,

    /// An insertion was attempted before any level was added.
    #[error("no cache levels")]
    NoLevels,

    /// The level index is out of range. Rendered 1-based for operators.
    #[error("no cache found for level {}", .index + 1)]
    LevelOutOfRange {
        /// Requested level index (0-based).
        index: usize,
        /// Number of levels at the time of the request.
        levels: usize,
    },
}

impl CacheError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPolicy(_) | Self::ZeroCapacity | Self::NoLevels => {
                ErrorKind::Configuration
            }
            Self::LevelOutOfRange { .. } => ErrorKind::Index,
        }
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
