use serde::Serialize;

use crate::readings::HookReading;

use super::config::ClassifierConfig;
use super::status::HookStatus;

/// Absolute tension band a value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TensionBand {
    Slack,
    Normal,
    Elevated,
    High,
    Extreme,
}

impl TensionBand {
    pub fn status(&self) -> HookStatus {
        match self {
            TensionBand::Slack | TensionBand::Elevated => HookStatus::Attention,
            TensionBand::Normal => HookStatus::Normal,
            TensionBand::High | TensionBand::Extreme => HookStatus::Critical,
        }
    }
}

/// Band for an absolute tension. Negative values land in the slack band.
pub fn tension_band(tension: f64, config: &ClassifierConfig) -> TensionBand {
    if tension >= config.extreme_from {
        TensionBand::Extreme
    } else if tension >= config.high_from {
        TensionBand::High
    } else if tension >= config.elevated_from {
        TensionBand::Elevated
    } else if tension >= config.normal_from {
        TensionBand::Normal
    } else {
        TensionBand::Slack
    }
}

pub fn classify_tension(tension: f64, config: &ClassifierConfig) -> HookStatus {
    tension_band(tension, config).status()
}

/// Percent-only heuristic for hooks whose rated maximum is unknown.
pub fn classify_percent(percent: f64, config: &ClassifierConfig) -> HookStatus {
    if percent >= config.percent_critical {
        HookStatus::Critical
    } else if percent >= config.percent_attention {
        HookStatus::Attention
    } else {
        HookStatus::Normal
    }
}

/// Classify one normalized reading.
///
/// Order matters: absolute tension beats a percent estimate, and a percent
/// estimate against a known max beats the percent-only heuristic. The server
/// hint is only consulted when the reading carries no numeric data at all.
pub fn classify(reading: &HookReading, config: &ClassifierConfig) -> HookStatus {
    if let Some(tension) = reading.tension {
        return classify_tension(tension, config);
    }

    match (reading.percent, reading.max_tension) {
        (Some(percent), Some(max)) => classify_tension(percent / 100.0 * max, config),
        (Some(percent), None) => classify_percent(percent, config),
        (None, _) => reading
            .status_hint
            .as_deref()
            .and_then(HookStatus::from_hint)
            .unwrap_or(HookStatus::Unknown),
    }
}
