//! Network probes.
//!
//! Each probe is a single best-effort attempt behind a narrow trait so the
//! sampler can be exercised with injected stand-ins. Probe failures never
//! escape this module as panics; the latency probe degrades to `None` and
//! the bandwidth probe returns a typed error for the sampler to absorb.

pub mod bandwidth;
pub mod latency;

pub use bandwidth::{BandwidthError, BandwidthProbe, HttpThroughputProber, Throughput};
pub use latency::{LatencyProbe, PingProber};
