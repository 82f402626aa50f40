//! Sample composition: one timestamp, one latency probe, one bandwidth
//! probe, one record.

use nw_common::Sample;
use tracing::{debug, warn};

use crate::probe::{BandwidthProbe, HttpThroughputProber, LatencyProbe, PingProber};

/// Composes probes into [`Sample`]s.
///
/// The bandwidth probe is the less reliable of the two (a network-
/// dependent third-party service with occasional no-server conditions), so
/// every one of its failures is absorbed here and degraded to unknown
/// throughput fields; a bandwidth outage never discards a valid latency
/// reading. No retry logic lives here: each composition is one
/// best-effort attempt, and the scheduler's next interval is the only
/// retry there is.
pub struct Sampler {
    latency: Box<dyn LatencyProbe>,
    bandwidth: Box<dyn BandwidthProbe>,
}

impl Sampler {
    /// Sampler with the standard probers for `host`.
    pub fn new(host: &str) -> Self {
        Self {
            latency: Box::new(PingProber::new(host)),
            bandwidth: Box::new(HttpThroughputProber::new()),
        }
    }

    /// Sampler over explicit probe implementations.
    pub fn with_probes(
        latency: Box<dyn LatencyProbe>,
        bandwidth: Box<dyn BandwidthProbe>,
    ) -> Self {
        Self { latency, bandwidth }
    }

    /// Take one measurement.
    ///
    /// The timestamp reflects start-of-measurement, so it is captured
    /// before either probe runs. The returned sample always has all four
    /// fields populated.
    pub fn compose(&self) -> Sample {
        let timestamp = Sample::now_timestamp();

        let ping_ms = self.latency.measure();
        debug!(?ping_ms, "latency probe finished");

        let (download_mbps, upload_mbps) = match self.bandwidth.measure() {
            Ok(t) => (Some(t.download_mbps), Some(t.upload_mbps)),
            Err(e) => {
                warn!(error = %e, "bandwidth probe failed, recording unknown throughput");
                (None, None)
            }
        };

        Sample {
            timestamp,
            ping_ms,
            download_mbps,
            upload_mbps,
        }
    }
}
