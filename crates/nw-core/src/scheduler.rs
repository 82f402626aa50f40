//! Fixed-cadence run loop with cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nw_common::Error;
use tracing::{error, info};

/// Cancellation must take effect within roughly this long, so interval
/// waits sleep in slices no longer than this and re-check the flag.
const POLL_SLICE: Duration = Duration::from_secs(1);

/// Shared cancellation flag, safe to set from any thread.
///
/// Cleared at loop start, set once per cancellation request.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The loop notices within about one second.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A validated run cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    interval: Duration,
    count: Option<u32>,
}

impl Schedule {
    /// Validate and build a schedule.
    ///
    /// The interval must be a positive whole number of seconds; the count,
    /// when given, a positive integer. Rejections happen here, before any
    /// measurement starts.
    pub fn new(interval_secs: i64, count: Option<i64>) -> Result<Self, Error> {
        if interval_secs <= 0 {
            return Err(Error::InvalidInterval(interval_secs));
        }
        let count = match count {
            Some(n) if n <= 0 => return Err(Error::InvalidCount(n)),
            Some(n) => Some(n as u32),
            None => None,
        };
        Ok(Self {
            interval: Duration::from_secs(interval_secs as u64),
            count,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `Some(n)` for a bounded schedule, `None` for an unbounded one.
    pub fn count(&self) -> Option<u32> {
        self.count
    }
}

/// How a run loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A bounded schedule performed every run.
    Completed { runs: u32 },
    /// Cancellation was requested; `runs` were performed before it.
    Cancelled { runs: u32 },
}

impl RunOutcome {
    pub fn runs(&self) -> u32 {
        match self {
            Self::Completed { runs } | Self::Cancelled { runs } => *runs,
        }
    }
}

/// Drive `job` on the schedule's cadence until the bounded count is
/// reached or cancellation is requested.
///
/// Runs are strictly sequential. A failing run is reported and the loop
/// proceeds to the next scheduled run after the normal wait; only
/// cancellation or the bounded count ends the loop. Bounded schedules do
/// not wait after the final run; unbounded ones wait after every run.
pub fn run_loop(
    schedule: Schedule,
    cancel: &CancelFlag,
    mut job: impl FnMut(u32) -> Result<(), Error>,
) -> RunOutcome {
    cancel.clear();

    let mut runs: u32 = 0;
    loop {
        if cancel.is_requested() {
            info!(runs, "run loop cancelled");
            return RunOutcome::Cancelled { runs };
        }

        runs += 1;
        match job(runs) {
            Ok(()) => info!(run = runs, "run complete"),
            Err(e) => error!(run = runs, error = %e, "run failed, continuing"),
        }

        if let Some(count) = schedule.count() {
            if runs >= count {
                info!(runs, "run loop finished");
                return RunOutcome::Completed { runs };
            }
        }

        if !wait_interruptible(schedule.interval(), cancel) {
            info!(runs, "run loop cancelled");
            return RunOutcome::Cancelled { runs };
        }
    }
}

/// Sleep for `interval`, polling the flag at [`POLL_SLICE`] granularity.
/// Returns `false` if cancellation was requested during the wait.
fn wait_interruptible(interval: Duration, cancel: &CancelFlag) -> bool {
    let mut remaining = interval;
    while !remaining.is_zero() {
        if cancel.is_requested() {
            return false;
        }
        let slice = remaining.min(POLL_SLICE);
        std::thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
    !cancel.is_requested()
}
