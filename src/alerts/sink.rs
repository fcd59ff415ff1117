use std::io::Write;

use crate::aggregation::StatusSummary;

use super::trigger::AlertEvent;

const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "alert";

use crate::{log_error, log_warn};

/// Where fired alerts go. Sinks must not block the poll loop.
pub trait AlertSink: Send + Sync {
    fn notify(&self, event: &AlertEvent, summary: &StatusSummary);
}

pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn notify(&self, event: &AlertEvent, summary: &StatusSummary) {
        let berths: Vec<&str> = summary
            .berths
            .iter()
            .filter(|berth| berth.counts.critical > 0)
            .map(|berth| berth.name.as_str())
            .collect();
        log_warn!(
            "CRITICAL tension: {} hook(s) critical at cycle {} (berths: {}) alert={}",
            event.critical_count,
            event.cycle,
            berths.join(", "),
            event.id
        );
    }
}

/// Audible cue: rings the terminal bell on stderr.
pub struct BellAlertSink;

impl AlertSink for BellAlertSink {
    fn notify(&self, _event: &AlertEvent, _summary: &StatusSummary) {
        let mut stderr = std::io::stderr();
        if let Err(err) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            log_error!("failed to ring terminal bell: {err}");
        }
    }
}
