use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

use crate::classification::ClassifierConfig;
use crate::debounce::{DEFAULT_EVICT_AFTER_MISSED_CYCLES, DEFAULT_THRESHOLD};
use crate::polling::LoopOptions;

pub const DEFAULT_SETTINGS_PATH: &str = "mooring-monitor.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorSettings {
    pub endpoint: String,
    pub poll_interval_ms: u64,
    pub fetch_timeout_ms: u64,
    pub debounce_threshold: u32,
    pub evict_after_missed_cycles: u64,
    /// Log the per-berth breakdown every N cycles (and on any change)
    pub summary_every_cycles: u64,
    pub audible_alerts: bool,
    pub snapshot_path: Option<PathBuf>,
    pub simulate: bool,
    pub classifier: ClassifierConfig,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/hooks".into(),
            poll_interval_ms: 2_000,
            fetch_timeout_ms: 5_000,
            debounce_threshold: DEFAULT_THRESHOLD,
            evict_after_missed_cycles: DEFAULT_EVICT_AFTER_MISSED_CYCLES,
            summary_every_cycles: 5,
            audible_alerts: true,
            snapshot_path: None,
            simulate: false,
            classifier: ClassifierConfig::default(),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl MonitorSettings {
    /// Read settings from `path`. A missing file means defaults; a file that
    /// does not parse is reported and also falls back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!("Ignoring unparseable settings in {}: {err}", path.display());
            Self::default()
        }))
    }

    /// Apply `MOORING_*` overrides. `lookup` is `std::env::var` in production.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("MOORING_ENDPOINT") {
            self.endpoint = endpoint;
        }

        if let Some(raw) = lookup("MOORING_POLL_INTERVAL_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.poll_interval_ms = ms,
                _ => warn!("Ignoring invalid MOORING_POLL_INTERVAL_MS={raw:?}"),
            }
        }

        if let Some(raw) = lookup("MOORING_SIMULATE") {
            self.simulate = is_truthy(&raw);
        }

        if lookup("MOORING_DEBUG").is_some_and(|raw| is_truthy(&raw)) {
            self.summary_every_cycles = 1;
        }

        self
    }

    pub fn loop_options(&self) -> LoopOptions {
        LoopOptions {
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms.max(1)),
        }
    }
}
