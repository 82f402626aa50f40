//! Log schema: field names, header line, and versioning.
//!
//! The on-disk log is a CSV file whose header names exactly these four
//! fields in exactly this order. The column set is a hard constant for the
//! log's whole lifetime: a file whose header differs is treated as
//! malformed, never reconciled.

/// Current schema version for the measurement log.
///
/// Follows semver: MAJOR.MINOR.PATCH. A MAJOR bump means the column set
/// changed, which existing logs cannot absorb.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Field names of the measurement log, in column order.
pub const LOG_FIELDS: [&str; 4] = ["timestamp", "ping_ms", "download_mbps", "upload_mbps"];

/// The exact header line written to a fresh log (without the trailing
/// newline).
pub fn header_line() -> String {
    LOG_FIELDS.join(",")
}

/// Check whether a header line read back from disk matches the schema.
pub fn header_matches(line: &str) -> bool {
    line.trim_end() == header_line()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_line_field_order() {
        assert_eq!(header_line(), "timestamp,ping_ms,download_mbps,upload_mbps");
    }

    #[test]
    fn test_header_matches_ignores_line_ending() {
        assert!(header_matches("timestamp,ping_ms,download_mbps,upload_mbps\n"));
        assert!(header_matches("timestamp,ping_ms,download_mbps,upload_mbps\r\n"));
    }

    #[test]
    fn test_header_mismatch_rejected() {
        assert!(!header_matches("timestamp,ping_ms,download_mbps"));
        assert!(!header_matches("ping_ms,timestamp,download_mbps,upload_mbps"));
        assert!(!header_matches(""));
    }
}
