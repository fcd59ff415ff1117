use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub id: String,
    pub raised_at: DateTime<Utc>,
    pub cycle: u64,
    /// Global critical count that raised the alert
    pub critical_count: usize,
}

/// Edge detector on the global critical count.
///
/// Fires once when the count goes from zero to positive and stays quiet
/// until it has dropped back to zero.
#[derive(Debug, Default)]
pub struct AlertTrigger {
    previous_critical: usize,
}

impl AlertTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, critical_count: usize, cycle: u64) -> Option<AlertEvent> {
        let fire = self.previous_critical == 0 && critical_count > 0;
        self.previous_critical = critical_count;

        fire.then(|| AlertEvent {
            id: Uuid::new_v4().to_string(),
            raised_at: Utc::now(),
            cycle,
            critical_count,
        })
    }

    pub fn previous_critical(&self) -> usize {
        self.previous_critical
    }
}
