//! Netwatch measurement log storage.
//!
//! This crate provides:
//! - [`append_sample`]: one durable, append-only write per measurement,
//!   creating the log (header included) lazily on first use
//! - [`load_log`]: the full log read back as an in-memory [`LogTable`]
//!   for analysis consumers
//!
//! The log assumes a single writer process. The file handle is opened,
//! written, and closed within each append; nothing is held across calls.

pub mod reader;
pub mod writer;

pub use reader::{load_log, LogTable};
pub use writer::append_sample;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from log store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
