//! Bandwidth probe: reference-server selection plus timed transfers.
//!
//! One download and one upload against the nearest of a set of reference
//! throughput endpoints (`__down?bytes=N` returns N bytes, `__up` accepts
//! a posted body). "Nearest" is decided by timing a small probe transfer
//! against each candidate; candidates that fail are skipped, and an
//! exhausted candidate list is an explicit [`BandwidthError::NoServer`].
//!
//! The measured transfers deliberately carry no overall timeout; this is
//! an accepted limitation of the observed behavior, kept rather than
//! silently changed. Only the selection probes are bounded, since ranking
//! must not hang on an unreachable candidate.

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

/// Download transfer size in bytes.
const DOWNLOAD_BYTES: u64 = 10_000_000;

/// Upload transfer size in bytes (upload links are typically slower).
const UPLOAD_BYTES: usize = 5_000_000;

/// Selection probe transfer size in bytes.
const PROBE_BYTES: u64 = 65_536;

/// Per-candidate timeout during server selection.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default reference servers.
const DEFAULT_SERVERS: &[ThroughputServer] = &[ThroughputServer {
    name: "cloudflare",
    base_url: "https://speed.cloudflare.com",
}];

/// Errors from bandwidth probing. All of them are absorbed by the sampler;
/// none propagate past it.
#[derive(Debug, Error)]
pub enum BandwidthError {
    #[error("no suitable throughput server")]
    NoServer,

    #[error("download transfer failed: {0}")]
    Download(String),

    #[error("upload transfer failed: {0}")]
    Upload(String),

    #[error("transfer completed too fast to measure")]
    TooFast,
}

/// One reference throughput endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThroughputServer {
    pub name: &'static str,
    pub base_url: &'static str,
}

/// Both throughput readings of one probe, in megabits per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub download_mbps: f64,
    pub upload_mbps: f64,
}

/// A single best-effort throughput measurement.
pub trait BandwidthProbe {
    /// Run server selection, one download, and one upload. Any failure in
    /// any step is a [`BandwidthError`]; partial results are not returned.
    fn measure(&self) -> Result<Throughput, BandwidthError>;
}

/// Bandwidth prober backed by HTTP reference endpoints.
#[derive(Debug, Clone)]
pub struct HttpThroughputProber {
    servers: Vec<ThroughputServer>,
}

impl Default for HttpThroughputProber {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpThroughputProber {
    pub fn new() -> Self {
        Self {
            servers: DEFAULT_SERVERS.to_vec(),
        }
    }

    /// Replace the candidate server list (tests, self-hosted endpoints).
    pub fn with_servers(servers: Vec<ThroughputServer>) -> Self {
        Self { servers }
    }

    /// Pick the candidate that answers a small probe transfer fastest.
    fn select_server(&self) -> Result<ThroughputServer, BandwidthError> {
        let agent = ureq::AgentBuilder::new().timeout(PROBE_TIMEOUT).build();

        let mut best: Option<(Duration, ThroughputServer)> = None;
        for server in &self.servers {
            let url = download_url(server, PROBE_BYTES);
            let start = Instant::now();
            let outcome = agent
                .get(&url)
                .call()
                .map_err(|e| e.to_string())
                .and_then(|resp| {
                    std::io::copy(&mut resp.into_reader(), &mut std::io::sink())
                        .map_err(|e| e.to_string())
                });
            match outcome {
                Ok(_) => {
                    let elapsed = start.elapsed();
                    debug!(server = server.name, ?elapsed, "selection probe succeeded");
                    if best.map_or(true, |(t, _)| elapsed < t) {
                        best = Some((elapsed, *server));
                    }
                }
                Err(e) => {
                    debug!(server = server.name, error = %e, "selection probe failed, skipping");
                }
            }
        }

        match best {
            Some((elapsed, server)) => {
                info!(server = server.name, ?elapsed, "throughput server selected");
                Ok(server)
            }
            None => Err(BandwidthError::NoServer),
        }
    }
}

impl BandwidthProbe for HttpThroughputProber {
    fn measure(&self) -> Result<Throughput, BandwidthError> {
        let server = self.select_server()?;

        // No timeout on the measured transfers themselves.
        let agent = ureq::AgentBuilder::new().build();

        let download_mbps = run_download(&agent, &server)?;
        info!(server = server.name, download_mbps, "download transfer complete");

        let upload_mbps = run_upload(&agent, &server)?;
        info!(server = server.name, upload_mbps, "upload transfer complete");

        Ok(Throughput {
            download_mbps,
            upload_mbps,
        })
    }
}

fn download_url(server: &ThroughputServer, bytes: u64) -> String {
    format!("{}/__down?bytes={}", server.base_url, bytes)
}

fn upload_url(server: &ThroughputServer) -> String {
    format!("{}/__up", server.base_url)
}

fn run_download(agent: &ureq::Agent, server: &ThroughputServer) -> Result<f64, BandwidthError> {
    let url = download_url(server, DOWNLOAD_BYTES);
    let start = Instant::now();

    let resp = agent
        .get(&url)
        .call()
        .map_err(|e| BandwidthError::Download(e.to_string()))?;

    let bytes = std::io::copy(&mut resp.into_reader(), &mut std::io::sink())
        .map_err(|e| BandwidthError::Download(e.to_string()))?;

    if bytes == 0 {
        return Err(BandwidthError::Download("empty response body".to_string()));
    }
    to_mbps(bytes, start.elapsed())
}

fn run_upload(agent: &ureq::Agent, server: &ThroughputServer) -> Result<f64, BandwidthError> {
    let payload: Vec<u8> = (0..UPLOAD_BYTES).map(|i| (i % 256) as u8).collect();
    let url = upload_url(server);
    let start = Instant::now();

    agent
        .post(&url)
        .set("Content-Type", "application/octet-stream")
        .send_bytes(&payload)
        .map_err(|e| BandwidthError::Upload(e.to_string()))?;

    to_mbps(UPLOAD_BYTES as u64, start.elapsed())
}

/// Convert a transfer of `bytes` over `elapsed` into megabits per second.
fn to_mbps(bytes: u64, elapsed: Duration) -> Result<f64, BandwidthError> {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        warn!("transfer elapsed time is zero");
        return Err(BandwidthError::TooFast);
    }
    Ok(bytes as f64 * 8.0 / (secs * 1_000_000.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_mbps_conversion() {
        // 1 MB in one second is 8 Mbps.
        let mbps = to_mbps(1_000_000, Duration::from_secs(1)).unwrap();
        assert!((mbps - 8.0).abs() < 1e-9);

        // 10 MB in two seconds is 40 Mbps.
        let mbps = to_mbps(10_000_000, Duration::from_secs(2)).unwrap();
        assert!((mbps - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_mbps_zero_elapsed_is_an_error() {
        assert!(matches!(
            to_mbps(1_000_000, Duration::ZERO),
            Err(BandwidthError::TooFast)
        ));
    }

    #[test]
    fn test_empty_candidate_list_is_no_server() {
        let prober = HttpThroughputProber::with_servers(Vec::new());
        assert!(matches!(prober.measure(), Err(BandwidthError::NoServer)));
    }

    #[test]
    fn test_unreachable_candidates_are_no_server() {
        // TEST-NET-1 is reserved; nothing answers there. The selection
        // probe times out or is refused, so selection must fail cleanly.
        let prober = HttpThroughputProber::with_servers(vec![ThroughputServer {
            name: "unreachable",
            base_url: "http://192.0.2.1:9",
        }]);
        assert!(matches!(prober.measure(), Err(BandwidthError::NoServer)));
    }

    #[test]
    fn test_endpoint_urls() {
        let server = ThroughputServer {
            name: "s",
            base_url: "https://example.com",
        };
        assert_eq!(
            download_url(&server, 1024),
            "https://example.com/__down?bytes=1024"
        );
        assert_eq!(upload_url(&server), "https://example.com/__up");
    }
}
