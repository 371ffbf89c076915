/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by flag and user storage backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend could not read the key.
    #[error("failed to read \"{key}\": {reason}")]
    Read {
        /// The key being read.
        key: String,
        /// Backend-specific failure description.
        reason: String,
    },

    /// The backend refused or failed to persist the key.
    #[error("failed to write \"{key}\": {reason}")]
    Write {
        /// The key being written.
        key: String,
        /// Backend-specific failure description.
        reason: String,
    },
}
