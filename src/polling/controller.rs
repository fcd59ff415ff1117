use anyhow::{bail, Context, Result};
use log::info;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::cycle::{PollCycle, PollOutcome};
use super::loop_worker::{poll_loop, LoopOptions};
use super::source::HookSource;

const OUTCOME_CHANNEL_CAPACITY: usize = 32;

/// Owns the background poll task.
pub struct MonitorController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl MonitorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Spawn the poll loop and hand back the stream of outcomes.
    pub async fn start(
        &mut self,
        source: Arc<dyn HookSource>,
        cycle: PollCycle,
        options: LoopOptions,
    ) -> Result<mpsc::Receiver<PollOutcome>> {
        if self.handle.is_some() {
            bail!("monitor already running");
        }

        let cancel_token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);

        info!("starting monitor against {}", source.describe());
        let handle = tokio::spawn(poll_loop(source, cycle, options, tx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(rx)
    }

    /// Cancel the loop and wait for it; an in-flight cycle finishes first.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("poll loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}
