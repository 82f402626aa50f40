//! Append-only log writer.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use nw_common::{header_line, Sample};
use tracing::debug;

use crate::StoreError;

/// Append one sample to the log at `path`.
///
/// Parent directories are created if absent. A file that does not exist
/// yet (or is empty) gets the schema header first; the header is never
/// rewritten after that. The whole operation is one sequential write on a
/// handle that is closed before returning.
pub fn append_sample(path: &Path, sample: &Sample) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let needs_header = file
        .metadata()
        .map(|m| m.len() == 0)
        .map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut buf = String::new();
    if needs_header {
        debug!(path = %path.display(), "creating log with header");
        buf.push_str(&header_line());
        buf.push('\n');
    }
    buf.push_str(&sample.to_record());
    buf.push('\n');

    file.write_all(buf.as_bytes()).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
