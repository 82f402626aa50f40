//! Netwatch common types and errors.
//!
//! This crate provides foundational types shared across the netwatch crates:
//! - The [`Sample`] measurement record and its CSV field encoding
//! - The log schema (field names, header line, schema version)
//! - The unified error type
//! - Output format specifications

pub mod error;
pub mod output;
pub mod sample;
pub mod schema;

pub use error::{Error, Result};
pub use output::OutputFormat;
pub use sample::{Sample, UNKNOWN};
pub use schema::{header_line, header_matches, LOG_FIELDS, SCHEMA_VERSION};
