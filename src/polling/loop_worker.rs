use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::cycle::{PollCycle, PollOutcome};
use super::source::HookSource;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "poll_loop";

use crate::{log_debug, log_info, log_warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    pub poll_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Run one poll cycle per tick until cancelled or the receiver goes away.
///
/// Cycles never overlap: each runs to completion inside the loop, and a tick
/// that falls due while a cycle is still in flight is dropped. After an
/// overrun the schedule restarts one full period after the slow cycle ended.
pub async fn poll_loop(
    source: Arc<dyn HookSource>,
    mut cycle: PollCycle,
    options: LoopOptions,
    outcomes: mpsc::Sender<PollOutcome>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(options.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    log_info!(
        "polling {} every {:?} (fetch timeout {:?})",
        source.describe(),
        options.poll_interval,
        options.fetch_timeout
    );

    loop {
        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log_info!("poll loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                let started = Instant::now();
                let outcome = cycle.run(source.as_ref(), options.fetch_timeout).await;
                let elapsed = started.elapsed();

                if elapsed >= options.poll_interval {
                    log_warn!(
                        "cycle {} took {:?} (> {:?}); dropping ticks that fell due meanwhile",
                        outcome.cycle(),
                        elapsed,
                        options.poll_interval
                    );
                    ticker.reset();
                } else {
                    log_debug!("cycle {} took {:?}", outcome.cycle(), elapsed);
                }

                if outcomes.send(outcome).await.is_err() {
                    log_info!("outcome receiver dropped; stopping poll loop");
                    break;
                }
            }
        }
    }
}
