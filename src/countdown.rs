/// The wait-then-decide loop at the heart of the gate.
///
/// Sleeps one poll quantum at a time, checking the abort flag after each
/// sleep and the elapsed time at each loop top. Worst-case abort-detection
/// latency is therefore one quantum.
use crate::signals::AbortFlag;
use std::time::{Duration, Instant};
use tracing::debug;

/// Result of a completed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The window elapsed with no abort request.
    Proceed,
    /// An abort was requested before the window elapsed.
    Aborted,
}

impl Outcome {
    /// Process exit code for this outcome: 0 = proceed, 1 = aborted.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Proceed => 0,
            Outcome::Aborted => 1,
        }
    }
}

pub struct Countdown {
    timeout: Duration,
    poll_interval: Duration,
}

impl Countdown {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Run the countdown to completion.
    ///
    /// The flag is checked after each sleep, never re-checked after the
    /// elapsed-time check passes: a signal landing in the gap between loop
    /// exit and process exit is not honored, proceed wins on the boundary.
    /// A zero timeout proceeds without entering the loop at all.
    pub async fn run(&self, abort: &AbortFlag) -> Outcome {
        let start = Instant::now();
        while start.elapsed() < self.timeout {
            tokio::time::sleep(self.poll_interval).await;
            if abort.is_set() {
                debug!(elapsed_ms = start.elapsed().as_millis() as u64, "abort detected");
                return Outcome::Aborted;
            }
        }
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "window elapsed, no abort");
        Outcome::Proceed
    }
}
