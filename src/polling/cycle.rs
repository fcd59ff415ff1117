use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::aggregation::{aggregate, ClassifiedHook, StatusSummary};
use crate::alerts::{AlertEvent, AlertSink, AlertTrigger};
use crate::classification::{classify, ClassifierConfig};
use crate::debounce::DebounceEngine;
use crate::readings::{decode_payload, HookIdentity, HookReading};

use super::source::{FetchError, HookSource};

const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "poll_cycle";

use crate::{log_debug, log_warn};

/// Everything the presentation layer needs for one successful poll.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSnapshot {
    pub cycle: u64,
    pub polled_at: DateTime<Utc>,
    pub hooks: Vec<ClassifiedHook>,
    pub summary: StatusSummary,
    pub alert: Option<AlertEvent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PollOutcome {
    Snapshot(PollSnapshot),
    #[serde(rename_all = "camelCase")]
    Unavailable {
        cycle: u64,
        at: DateTime<Utc>,
        reason: String,
    },
}

impl PollOutcome {
    pub fn cycle(&self) -> u64 {
        match self {
            PollOutcome::Snapshot(snapshot) => snapshot.cycle,
            PollOutcome::Unavailable { cycle, .. } => *cycle,
        }
    }

    pub fn snapshot(&self) -> Option<&PollSnapshot> {
        match self {
            PollOutcome::Snapshot(snapshot) => Some(snapshot),
            PollOutcome::Unavailable { .. } => None,
        }
    }
}

/// Collapse repeated identities to their last entry so each hook is debounced
/// at most once per poll. Payload order of the kept entries is preserved.
fn keep_last_per_identity(readings: Vec<HookReading>) -> Vec<HookReading> {
    let mut latest: HashMap<HookIdentity, usize> = HashMap::with_capacity(readings.len());
    for (index, reading) in readings.iter().enumerate() {
        if let Some(earlier) = latest.insert(reading.identity.clone(), index) {
            log_warn!(
                "{} listed twice (entries {earlier} and {index}), keeping the later one",
                reading.identity
            );
        }
    }

    readings
        .into_iter()
        .enumerate()
        .filter(|(index, reading)| latest.get(&reading.identity) == Some(index))
        .map(|(_, reading)| reading)
        .collect()
}

/// State carried across polls: the debounce map, the alert edge detector and
/// the cycle counters. Everything else is rebuilt from scratch each poll.
pub struct PollCycle {
    classifier: ClassifierConfig,
    debounce: DebounceEngine,
    trigger: AlertTrigger,
    sinks: Vec<Box<dyn AlertSink>>,
    /// Every attempt, successful or not
    attempts: u64,
    /// Successful cycles only; drives debounce eviction
    applied: u64,
}

impl PollCycle {
    pub fn new(
        classifier: ClassifierConfig,
        debounce: DebounceEngine,
        sinks: Vec<Box<dyn AlertSink>>,
    ) -> Self {
        Self {
            classifier,
            debounce,
            trigger: AlertTrigger::new(),
            sinks,
            attempts: 0,
            applied: 0,
        }
    }

    pub fn debounce(&self) -> &DebounceEngine {
        &self.debounce
    }

    /// Fetch from `source` (bounded by `timeout`) and process the result.
    pub async fn run(&mut self, source: &dyn HookSource, timeout: Duration) -> PollOutcome {
        let fetched = match tokio::time::timeout(timeout, source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };
        self.process(fetched)
    }

    /// Turn one fetch result into an outcome. Failures leave the debounce map
    /// and alert trigger untouched.
    pub fn process(&mut self, fetched: Result<Value, FetchError>) -> PollOutcome {
        self.attempts += 1;
        let cycle = self.attempts;

        let readings = match fetched.and_then(|doc| decode_payload(&doc).map_err(FetchError::from)) {
            Ok(readings) => readings,
            Err(err) => {
                log_warn!("cycle {cycle} unavailable: {err}");
                return PollOutcome::Unavailable {
                    cycle,
                    at: Utc::now(),
                    reason: err.to_string(),
                };
            }
        };

        self.applied += 1;
        let applied = self.applied;

        let hooks: Vec<ClassifiedHook> = keep_last_per_identity(readings)
            .into_iter()
            .map(|reading| {
                let observed_status = classify(&reading, &self.classifier);
                let stable_status = self.debounce.observe(&reading.identity, observed_status, applied);
                ClassifiedHook::new(reading, observed_status, stable_status)
            })
            .collect();

        self.debounce.evict_stale(applied);

        let summary = aggregate(&hooks);
        let alert = self.trigger.update(summary.global.critical, cycle);
        if let Some(event) = &alert {
            for sink in &self.sinks {
                sink.notify(event, &summary);
            }
        }

        log_debug!(
            "cycle {cycle}: {} hooks, {} critical, {} attention, {} tracked",
            summary.global.total,
            summary.global.critical,
            summary.global.attention,
            self.debounce.tracked_hooks()
        );

        PollOutcome::Snapshot(PollSnapshot {
            cycle,
            polled_at: Utc::now(),
            hooks,
            summary,
            alert,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::HookStatus::{self, *};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSink {
        fired: Arc<Mutex<Vec<AlertEvent>>>,
    }

    impl AlertSink for RecordingSink {
        fn notify(&self, event: &AlertEvent, _summary: &StatusSummary) {
            self.fired.lock().unwrap().push(event.clone());
        }
    }

    fn cycle_with_sink() -> (PollCycle, RecordingSink) {
        let sink = RecordingSink::default();
        let cycle = PollCycle::new(
            ClassifierConfig::default(),
            DebounceEngine::default(),
            vec![Box::new(sink.clone())],
        );
        (cycle, sink)
    }

    fn doc_with_tension(tension: f64) -> Value {
        json!({"hooks": [{
            "port_name": "Port", "berth_name": "Berth One",
            "bollard_name": "B1", "hook_name": "H1", "tension": tension
        }]})
    }

    fn stable(outcome: &PollOutcome) -> HookStatus {
        outcome.snapshot().unwrap().hooks[0].stable_status
    }

    #[test]
    fn percent_estimate_end_to_end() {
        let (mut cycle, sink) = cycle_with_sink();
        let doc = json!({"hooks": [{
            "tension": null, "percent": 85, "max_tension": 10,
            "berth_name": "Berth One", "bollard_name": "B1", "hook_name": "H1"
        }]});

        let outcome = cycle.process(Ok(doc));
        let snapshot = outcome.snapshot().unwrap();

        assert_eq!(snapshot.hooks[0].observed_status, Critical);
        assert_eq!(snapshot.summary.global.critical, 1);
        assert!(snapshot.alert.is_some());
        assert_eq!(sink.fired.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_numbers_count_as_unknown() {
        let (mut cycle, _) = cycle_with_sink();
        let doc = json!({"hooks": [{"berth_name": "Berth One", "bollard_name": "B1", "hook_name": "H1"}]});

        let outcome = cycle.process(Ok(doc));
        let summary = &outcome.snapshot().unwrap().summary;

        assert_eq!(summary.global.unknown, 1);
        assert_eq!(summary.global.normal, 0);
    }

    #[test]
    fn debounce_runs_across_cycles() {
        let (mut cycle, _) = cycle_with_sink();
        // attention (5), critical (7), critical (7), then normal (3)
        let stables: Vec<_> = [5.0, 7.0, 7.0, 3.0]
            .into_iter()
            .map(|t| stable(&cycle.process(Ok(doc_with_tension(t)))))
            .collect();
        assert_eq!(stables, vec![Attention, Attention, Critical, Normal]);
    }

    #[test]
    fn repeated_hook_is_debounced_once_per_cycle() {
        let (mut cycle, _) = cycle_with_sink();
        assert_eq!(stable(&cycle.process(Ok(doc_with_tension(5.0)))), Attention);

        let hook = json!({
            "port_name": "Port", "berth_name": "Berth One",
            "bollard_name": "B1", "hook_name": "H1", "tension": 7.0
        });
        let outcome = cycle.process(Ok(json!({"hooks": [hook.clone(), hook]})));
        let snapshot = outcome.snapshot().unwrap();

        assert_eq!(snapshot.hooks.len(), 1);
        assert_eq!(snapshot.hooks[0].observed_status, Critical);
        assert_eq!(snapshot.hooks[0].stable_status, Attention);
        assert_eq!(snapshot.summary.global.total, 1);

        let state = cycle.debounce().state_of(&HookIdentity::new("Port", "Berth One", "B1", "H1")).unwrap();
        assert_eq!(state.consecutive_count, 1);

        assert_eq!(stable(&cycle.process(Ok(doc_with_tension(7.0)))), Critical);
    }

    #[test]
    fn later_duplicate_wins() {
        let (mut cycle, _) = cycle_with_sink();
        let doc = json!({"hooks": [
            {"berth_name": "Berth One", "bollard_name": "B1", "hook_name": "H1", "tension": 3.0},
            {"berth_name": "Berth One", "bollard_name": "B1", "hook_name": "H2", "tension": 1.0},
            {"berth_name": "Berth One", "bollard_name": "B1", "hook_name": "H1", "tension": 9.5}
        ]});

        let outcome = cycle.process(Ok(doc));
        let hooks = &outcome.snapshot().unwrap().hooks;

        let names: Vec<_> = hooks.iter().map(|h| h.reading.identity.hook_name.as_deref()).collect();
        assert_eq!(names, vec![Some("H2"), Some("H1")]);
        assert_eq!(hooks[1].reading.tension, Some(9.5));
        assert_eq!(hooks[1].stable_status, Critical);
    }

    #[test]
    fn failed_cycle_preserves_state() {
        let (mut cycle, sink) = cycle_with_sink();

        assert_eq!(stable(&cycle.process(Ok(doc_with_tension(7.0)))), Critical);
        let before = *cycle.debounce().state_of(&HookIdentity::new("Port", "Berth One", "B1", "H1")).unwrap();

        let failed = cycle.process(Err(FetchError::Transport("connection refused".into())));
        match &failed {
            PollOutcome::Unavailable { cycle: 2, reason, .. } => {
                assert!(reason.contains("connection refused"))
            }
            other => panic!("expected unavailable, got {other:?}"),
        }

        let after = *cycle.debounce().state_of(&HookIdentity::new("Port", "Berth One", "B1", "H1")).unwrap();
        assert_eq!(before, after);

        // Still critical after the gap: no second alert.
        assert_eq!(stable(&cycle.process(Ok(doc_with_tension(8.0)))), Critical);
        assert_eq!(sink.fired.lock().unwrap().len(), 1);
    }

    #[test]
    fn undecodable_payload_is_unavailable() {
        let (mut cycle, _) = cycle_with_sink();
        let outcome = cycle.process(Ok(json!({"hooks": 12})));
        assert!(matches!(outcome, PollOutcome::Unavailable { .. }));
        assert_eq!(cycle.debounce().tracked_hooks(), 0);
    }

    #[test]
    fn alert_refires_only_after_clearing() {
        let (mut cycle, sink) = cycle_with_sink();
        for tension in [7.0, 8.0, 3.0, 3.0, 9.5, 9.5] {
            cycle.process(Ok(doc_with_tension(tension)));
        }
        let fired: Vec<u64> = sink.fired.lock().unwrap().iter().map(|e| e.cycle).collect();
        assert_eq!(fired, vec![1, 5]);
    }

    #[test]
    fn vanished_hooks_are_evicted() {
        let mut cycle = PollCycle::new(ClassifierConfig::default(), DebounceEngine::new(2, 1), Vec::new());
        cycle.process(Ok(doc_with_tension(3.0)));
        cycle.process(Ok(json!({"hooks": []})));
        assert_eq!(cycle.debounce().tracked_hooks(), 1);
        cycle.process(Ok(json!({"hooks": []})));
        assert_eq!(cycle.debounce().tracked_hooks(), 0);
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let (mut cycle, _) = cycle_with_sink();
        let outcome = cycle.process(Ok(doc_with_tension(3.0)));
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["kind"], "snapshot");
        assert_eq!(json["hooks"][0]["stableStatus"], "normal");
        assert_eq!(json["hooks"][0]["hookName"], "H1");
        assert_eq!(json["summary"]["global"]["normal"], 1);
        assert!(json["hooks"][0]["percentOfMax"].is_null());
        assert_eq!(json["hooks"][0]["rateOfChange"], 0.0);
    }

    #[test]
    fn derived_display_fields_are_serialized() {
        let (mut cycle, _) = cycle_with_sink();
        let doc = json!({"hooks": [{
            "berth_name": "Berth One", "bollard_name": "B1", "hook_name": "H1",
            "tension": 4.5, "max_tension": 9.0,
            "history": [
                {"tension": 3.0, "timestamp": "2025-01-01T10:00:00Z"},
                {"tension": 4.5, "timestamp": "2025-01-01T10:00:02Z"}
            ]
        }]});

        let json = serde_json::to_value(cycle.process(Ok(doc))).unwrap();
        let hook = &json["hooks"][0];

        assert_eq!(hook["percentOfMax"], 50.0);
        assert_eq!(hook["rateOfChange"], 1.5);
        assert_eq!(hook["lastSampleAt"], "2025-01-01T10:00:02Z");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out() {
        struct Stalled;

        #[async_trait::async_trait]
        impl HookSource for Stalled {
            async fn fetch(&self) -> Result<Value, FetchError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(json!({}))
            }

            fn describe(&self) -> String {
                "stalled".into()
            }
        }

        let (mut cycle, _) = cycle_with_sink();
        let outcome = cycle.run(&Stalled, Duration::from_secs(5)).await;
        match outcome {
            PollOutcome::Unavailable { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
