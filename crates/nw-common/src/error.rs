//! Error types for netwatch.

use thiserror::Error;

/// Result type alias for netwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for netwatch.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid interval: {0} (must be a positive number of seconds)")]
    InvalidInterval(i64),

    #[error("invalid run count: {0} (must be a positive integer)")]
    InvalidCount(i64),

    // Storage errors (20-29)
    #[error("log store failure: {0}")]
    Store(String),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for stable exit-code mapping in the CLI.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidInterval(_) => 11,
            Error::InvalidCount(_) => 12,
            Error::Store(_) => 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert_eq!(Error::InvalidInterval(0).code(), 11);
        assert_eq!(Error::InvalidCount(-1).code(), 12);
        assert_eq!(Error::Store("x".into()).code(), 20);
    }

    #[test]
    fn test_messages_name_the_constraint() {
        assert!(Error::InvalidInterval(0).to_string().contains("positive"));
        assert!(Error::InvalidCount(0).to_string().contains("positive"));
    }
}
