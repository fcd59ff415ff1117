use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classification::HookStatus;
use crate::readings::{HookIdentity, HookReading};

/// A reading with its per-poll and debounced status, plus the display values
/// derived from it. Built once per poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedHook {
    #[serde(flatten)]
    pub reading: HookReading,
    pub observed_status: HookStatus,
    pub stable_status: HookStatus,
    pub percent_of_max: Option<f64>,
    pub rate_of_change: f64,
    pub last_sample_at: Option<DateTime<Utc>>,
}

impl ClassifiedHook {
    pub fn new(reading: HookReading, observed_status: HookStatus, stable_status: HookStatus) -> Self {
        Self {
            percent_of_max: reading.effective_percent(),
            rate_of_change: reading.rate_of_change(),
            last_sample_at: reading.last_sample_at(),
            reading,
            observed_status,
            stable_status,
        }
    }

    pub fn identity(&self) -> &HookIdentity {
        &self.reading.identity
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCounts {
    pub critical: usize,
    pub attention: usize,
    pub normal: usize,
    pub unknown: usize,
    pub total: usize,
}

impl GroupCounts {
    pub fn record(&mut self, status: HookStatus) {
        match status {
            HookStatus::Critical => self.critical += 1,
            HookStatus::Attention => self.attention += 1,
            HookStatus::Normal => self.normal += 1,
            HookStatus::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }

    /// Most severe status present, `None` for an empty group.
    pub fn worst_status(&self) -> Option<HookStatus> {
        [
            (HookStatus::Normal, self.normal),
            (HookStatus::Unknown, self.unknown),
            (HookStatus::Attention, self.attention),
            (HookStatus::Critical, self.critical),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(status, _)| status)
        .max_by_key(HookStatus::severity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BollardGroup {
    pub name: String,
    pub counts: GroupCounts,
    /// Indices into the cycle's classified hooks
    pub hooks: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BerthGroup {
    pub name: String,
    pub counts: GroupCounts,
    pub bollards: Vec<BollardGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub global: GroupCounts,
    pub berths: Vec<BerthGroup>,
}

impl StatusSummary {
    pub fn berth(&self, name: &str) -> Option<&BerthGroup> {
        self.berths.iter().find(|berth| berth.name == name)
    }
}

impl BerthGroup {
    pub fn bollard(&self, name: &str) -> Option<&BollardGroup> {
        self.bollards.iter().find(|bollard| bollard.name == name)
    }
}
