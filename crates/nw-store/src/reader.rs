//! Log loader.

use std::path::Path;

use nw_common::{header_matches, Sample, LOG_FIELDS};
use tracing::{debug, warn};

use crate::StoreError;

/// The full log loaded into memory: the schema's field names plus every
/// record in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct LogTable {
    rows: Vec<Sample>,
}

impl LogTable {
    /// Build a table directly from records, preserving their order.
    pub fn from_rows(rows: Vec<Sample>) -> Self {
        Self { rows }
    }

    /// Field names of the table, in column order.
    pub fn field_names(&self) -> &'static [&'static str] {
        &LOG_FIELDS
    }

    /// All records in file order.
    pub fn rows(&self) -> &[Sample] {
        &self.rows
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One metric column by field name, preserving row order.
    ///
    /// Returns `None` for a name outside the schema. The `timestamp`
    /// column is integral; fetch it via [`LogTable::timestamps`] instead.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        match name {
            "ping_ms" => Some(self.rows.iter().map(|r| r.ping_ms).collect()),
            "download_mbps" => Some(self.rows.iter().map(|r| r.download_mbps).collect()),
            "upload_mbps" => Some(self.rows.iter().map(|r| r.upload_mbps).collect()),
            _ => None,
        }
    }

    /// The timestamp column, preserving row order.
    pub fn timestamps(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.timestamp).collect()
    }
}

/// Load the full log at `path`.
///
/// Outcomes:
/// - missing file, header-only file, or a file whose header or rows do not
///   match the schema: `Ok(None)` with a diagnostic, a defined "no data"
///   outcome, not an error;
/// - an existing file that cannot be read: `Err(StoreError)` for the
///   caller to report.
pub fn load_log(path: &Path) -> Result<Option<LogTable>, StoreError> {
    if !path.exists() {
        warn!(path = %path.display(), "log file does not exist, nothing to load");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut lines = content.lines();
    let header = match lines.next() {
        Some(line) => line,
        None => {
            warn!(path = %path.display(), "log file is empty, nothing to load");
            return Ok(None);
        }
    };

    if !header_matches(header) {
        warn!(
            path = %path.display(),
            header,
            "log header does not match the schema, refusing to load"
        );
        return Ok(None);
    }

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match Sample::from_record(line) {
            Some(sample) => rows.push(sample),
            None => {
                // Line numbers are 1-based and the header is line 1.
                warn!(
                    path = %path.display(),
                    line = idx + 2,
                    "malformed log record, refusing to load"
                );
                return Ok(None);
            }
        }
    }

    if rows.is_empty() {
        warn!(path = %path.display(), "log contains no records, nothing to load");
        return Ok(None);
    }

    debug!(path = %path.display(), records = rows.len(), "log loaded");
    Ok(Some(LogTable { rows }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::append_sample;
    use nw_common::header_line;

    #[test]
    fn test_load_missing_path_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such.csv");
        assert!(load_log(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_header_only_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.csv");
        std::fs::write(&path, format!("{}\n", header_line())).unwrap();
        assert!(load_log(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_zero_byte_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.csv");
        std::fs::write(&path, "").unwrap();
        assert!(load_log(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_foreign_header_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.csv");
        std::fs::write(&path, "time,latency\n1,2\n").unwrap();
        assert!(load_log(&path).unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_row_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.csv");
        std::fs::write(
            &path,
            format!("{}\n1700000000,1.0,2.0,3.0\ntruncated,row\n", header_line()),
        )
        .unwrap();
        assert!(load_log(&path).unwrap().is_none());
    }

    #[test]
    fn test_append_then_load_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.csv");

        let samples = [
            Sample {
                timestamp: 1_700_000_000,
                ping_ms: Some(23.4),
                download_mbps: Some(450.2),
                upload_mbps: Some(89.1),
            },
            Sample {
                timestamp: 1_700_000_300,
                ping_ms: None,
                download_mbps: None,
                upload_mbps: None,
            },
            Sample {
                timestamp: 1_700_000_600,
                ping_ms: Some(0.333333333333333),
                download_mbps: None,
                upload_mbps: Some(12.0),
            },
        ];
        for s in &samples {
            append_sample(&path, s).unwrap();
        }

        let table = load_log(&path).unwrap().expect("table present");
        assert_eq!(table.rows(), &samples);
    }

    #[test]
    fn test_column_access_by_field_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs.csv");
        append_sample(
            &path,
            &Sample {
                timestamp: 1,
                ping_ms: Some(5.0),
                download_mbps: None,
                upload_mbps: Some(7.0),
            },
        )
        .unwrap();

        let table = load_log(&path).unwrap().unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.column("ping_ms").unwrap(), vec![Some(5.0)]);
        assert_eq!(table.column("download_mbps").unwrap(), vec![None]);
        assert_eq!(table.column("upload_mbps").unwrap(), vec![Some(7.0)]);
        assert_eq!(table.column("bogus"), None);
        assert_eq!(table.timestamps(), vec![1]);
        assert_eq!(table.field_names(), &LOG_FIELDS);
    }
}
