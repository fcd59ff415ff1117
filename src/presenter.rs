//! Log-based status view, plus an optional JSON snapshot file for external
//! dashboards.

use anyhow::{Context, Result};
use std::{fs, path::Path, path::PathBuf};

use crate::aggregation::GroupCounts;
use crate::polling::{PollOutcome, PollSnapshot};

const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "status";

use crate::{log_debug, log_info, log_warn};

pub fn format_counts(counts: &GroupCounts) -> String {
    format!(
        "{} critical, {} attention, {} normal, {} unknown ({} hooks)",
        counts.critical, counts.attention, counts.normal, counts.unknown, counts.total
    )
}

fn replace_file(path: &Path, contents: String) -> Result<()> {
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, contents)
        .with_context(|| format!("Failed to write snapshot to {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to move snapshot into {}", path.display()))
}

/// Write the outcome as pretty JSON, replacing the file atomically. The file
/// work runs on the blocking pool.
pub async fn write_snapshot(path: &Path, outcome: &PollOutcome) -> Result<()> {
    let serialized = serde_json::to_string_pretty(outcome)?;
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_file(&path, serialized))
        .await
        .context("snapshot writer join failed")?
}

pub struct Presenter {
    summary_every_cycles: u64,
    snapshot_path: Option<PathBuf>,
    last_global: Option<GroupCounts>,
    unavailable: bool,
}

impl Presenter {
    pub fn new(summary_every_cycles: u64, snapshot_path: Option<PathBuf>) -> Self {
        Self {
            summary_every_cycles: summary_every_cycles.max(1),
            snapshot_path,
            last_global: None,
            unavailable: false,
        }
    }

    pub async fn present(&mut self, outcome: &PollOutcome) -> Result<()> {
        match outcome {
            PollOutcome::Snapshot(snapshot) => self.present_snapshot(snapshot),
            PollOutcome::Unavailable { cycle, reason, .. } => {
                self.unavailable = true;
                log_warn!("telemetry unavailable (cycle {cycle}): {reason}");
            }
        }

        match &self.snapshot_path {
            Some(path) => write_snapshot(path, outcome).await,
            None => Ok(()),
        }
    }

    /// Breakdown is logged on a fixed stride and whenever global counts move.
    fn wants_breakdown(&self, snapshot: &PollSnapshot) -> bool {
        self.last_global != Some(snapshot.summary.global)
            || snapshot.cycle % self.summary_every_cycles == 1
            || self.summary_every_cycles == 1
    }

    fn present_snapshot(&mut self, snapshot: &PollSnapshot) {
        if self.unavailable {
            log_info!("telemetry available again at cycle {}", snapshot.cycle);
            self.unavailable = false;
        }

        let global = snapshot.summary.global;
        log_debug!("cycle {}: {}", snapshot.cycle, format_counts(&global));

        if self.wants_breakdown(snapshot) {
            log_info!("cycle {} port-wide: {}", snapshot.cycle, format_counts(&global));
            for berth in &snapshot.summary.berths {
                log_info!(
                    "  {} [{}]: {}",
                    berth.name,
                    berth.counts.worst_status().map_or("empty", |s| s.as_str()),
                    format_counts(&berth.counts)
                );
                for bollard in &berth.bollards {
                    log_debug!("    {}: {}", bollard.name, format_counts(&bollard.counts));
                }
            }
        }

        self.last_global = Some(global);
    }
}
