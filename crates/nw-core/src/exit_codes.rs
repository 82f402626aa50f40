//! Exit codes for the netwatch CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing.

/// Exit codes for netwatch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean completion (including "nothing to report").
    Clean = 0,

    /// Run loop ended by cancellation request.
    Interrupted = 6,

    /// Configuration error; nothing was measured.
    ConfigError = 10,

    /// Storage or other I/O error.
    IoError = 13,

    /// Internal/unknown error.
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::Interrupted)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::Interrupted.as_i32(), 6);
        assert_eq!(ExitCode::ConfigError.as_i32(), 10);
        assert_eq!(ExitCode::IoError.as_i32(), 13);
        assert_eq!(ExitCode::InternalError.as_i32(), 99);
    }

    #[test]
    fn test_interrupted_counts_as_success() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::Interrupted.is_success());
        assert!(!ExitCode::ConfigError.is_success());
    }
}
