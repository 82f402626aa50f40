//! Run configuration and validation.

use std::path::PathBuf;

use nw_common::Error;

use crate::probe::latency::DEFAULT_HOST;

/// Directory component of the default log path, under the platform's
/// local data directory.
const DATA_SUBDIR: &str = "netwatch";

/// File name of the measurement log.
const LOG_FILE: &str = "logs.csv";

/// Resolved configuration for measurement runs.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    /// Ping target host.
    pub host: String,
    /// Path of the measurement log.
    pub output: PathBuf,
    /// Seconds between consecutive runs.
    pub interval_secs: i64,
    /// Bounded run count; `None` runs until cancelled.
    pub count: Option<i64>,
    /// Whether repeated-run mode is enabled.
    pub repeat: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            output: default_log_path(),
            interval_secs: 300,
            count: None,
            repeat: false,
        }
    }
}

impl WatchConfig {
    /// Validate the configuration before any measurement starts.
    ///
    /// Rejects a non-positive interval, a non-positive count, and a
    /// bounded count without repeated-run mode. This is the only error
    /// class that may prevent a run from starting at all.
    pub fn validate(&self) -> Result<(), Error> {
        if self.interval_secs <= 0 {
            return Err(Error::InvalidInterval(self.interval_secs));
        }
        if let Some(count) = self.count {
            if count <= 0 {
                return Err(Error::InvalidCount(count));
            }
            if !self.repeat {
                return Err(Error::Config(
                    "a run count requires repeated-run mode".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Default log path: `<platform data dir>/netwatch/logs.csv`, falling back
/// to a relative path when no data directory is resolvable.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_SUBDIR)
        .join(LOG_FILE)
}
