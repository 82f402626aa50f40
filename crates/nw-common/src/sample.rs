//! The measurement record.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::schema::LOG_FIELDS;

/// Placeholder text for a measurement that could not be obtained.
///
/// Kept as the literal `nan` so logs written by earlier generations of the
/// tool (which recorded a float NaN) parse and re-serialize unchanged.
pub const UNKNOWN: &str = "nan";

/// One composed measurement: a timestamp plus the latency and throughput
/// readings taken at that time.
///
/// Every field is always populated; a sub-measurement that failed is an
/// explicit `None`, never an absent column. A sample is immutable once
/// composed; there is no mutating API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Seconds since the Unix epoch, captured at the start of measurement.
    pub timestamp: i64,
    /// Round-trip latency to the probe target in milliseconds.
    pub ping_ms: Option<f64>,
    /// Download throughput in megabits per second.
    pub download_mbps: Option<f64>,
    /// Upload throughput in megabits per second.
    pub upload_mbps: Option<f64>,
}

impl Sample {
    /// Capture the current epoch timestamp for a sample about to be taken.
    ///
    /// The timestamp reflects start-of-measurement, not completion, so it
    /// must be captured before any prober runs.
    pub fn now_timestamp() -> i64 {
        Utc::now().timestamp()
    }

    /// Encode this sample as one CSV record (without the trailing newline),
    /// fields in [`LOG_FIELDS`] order.
    pub fn to_record(&self) -> String {
        format!(
            "{},{},{},{}",
            self.timestamp,
            format_field(self.ping_ms),
            format_field(self.download_mbps),
            format_field(self.upload_mbps),
        )
    }

    /// Decode one CSV record into a sample.
    ///
    /// Returns `None` for anything that is not exactly four well-formed
    /// fields; callers treat that as a malformed row.
    pub fn from_record(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim_end().split(',').collect();
        if fields.len() != LOG_FIELDS.len() {
            return None;
        }
        Some(Self {
            timestamp: fields[0].trim().parse::<i64>().ok()?,
            ping_ms: parse_field(fields[1])?,
            download_mbps: parse_field(fields[2])?,
            upload_mbps: parse_field(fields[3])?,
        })
    }
}

impl std::fmt::Display for Sample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "timestamp={} ping_ms={} download_mbps={} upload_mbps={}",
            self.timestamp,
            format_field(self.ping_ms),
            format_field(self.download_mbps),
            format_field(self.upload_mbps),
        )
    }
}

/// Format one metric field: a finite value as its shortest round-trip
/// decimal form, an unknown as the stable placeholder.
fn format_field(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => UNKNOWN.to_string(),
    }
}

/// Parse one metric field.
///
/// `Some(None)` is a present-but-unknown value: the placeholder text in any
/// case, an empty field, or a float that parses to NaN. `None` means the
/// field is malformed.
fn parse_field(field: &str) -> Option<Option<f64>> {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case(UNKNOWN) {
        return Some(None);
    }
    let value = field.parse::<f64>().ok()?;
    if value.is_nan() {
        return Some(None);
    }
    Some(Some(value))
}
