//! Settlement Worker - polling driver
//!
//! Calls the engine once per tick. A settled trade is followed immediately
//! by the next attempt; an empty queue or a transient failure waits one poll
//! interval. Shutdown is only observed between attempts.

use tokio::sync::watch;
use tokio::time::{Duration, sleep};
use tracing::{error, info, trace, warn};

use super::engine::{SettlementEngine, SettlementOutcome};
use super::error::SettlementError;

/// Counters reported when the worker stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub settled: u64,
    pub idle_polls: u64,
    pub transient_errors: u64,
}

pub struct SettlementWorker {
    engine: SettlementEngine,
    poll_interval: Duration,
}

impl SettlementWorker {
    pub fn new(engine: SettlementEngine, poll_interval: Duration) -> Self {
        Self {
            engine,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped).
    ///
    /// Returns the fatal error that stopped the loop, if any.
    pub async fn run(
        &self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<WorkerStats, SettlementError> {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Settlement worker started"
        );

        let mut stats = WorkerStats::default();

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.engine.settle_once().await {
                Ok(SettlementOutcome::Settled(_)) => {
                    stats.settled += 1;
                    continue;
                }
                Ok(SettlementOutcome::NoWorkAvailable) => {
                    stats.idle_polls += 1;
                    trace!("Queue empty");
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Unrecoverable settlement failure, stopping worker");
                    return Err(e);
                }
                Err(e) => {
                    stats.transient_errors += 1;
                    warn!(error = %e, "Settlement attempt rolled back, retrying next tick");
                }
            }

            tokio::select! {
                _ = sleep(self.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(
            settled = stats.settled,
            idle_polls = stats.idle_polls,
            transient_errors = stats.transient_errors,
            "Settlement worker stopped"
        );
        Ok(stats)
    }
}
