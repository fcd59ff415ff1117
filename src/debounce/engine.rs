use std::collections::HashMap;

use crate::classification::HookStatus;
use crate::readings::HookIdentity;

use super::state::{transition, DebounceState};

const ENABLE_LOGS: bool = true;
const LOG_TAG: &str = "debounce";

use crate::log_debug;

pub const DEFAULT_THRESHOLD: u32 = 2;
pub const DEFAULT_EVICT_AFTER_MISSED_CYCLES: u64 = 30;

/// Per-hook debounce state, keyed by hook identity.
///
/// The map is private: callers feed observations in and get stable statuses
/// back. Entries for hooks that stop appearing are dropped by
/// [`evict_stale`](Self::evict_stale).
#[derive(Debug)]
pub struct DebounceEngine {
    threshold: u32,
    evict_after_missed_cycles: u64,
    states: HashMap<HookIdentity, DebounceState>,
}

impl Default for DebounceEngine {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, DEFAULT_EVICT_AFTER_MISSED_CYCLES)
    }
}

impl DebounceEngine {
    pub fn new(threshold: u32, evict_after_missed_cycles: u64) -> Self {
        Self {
            threshold: threshold.max(1),
            evict_after_missed_cycles,
            states: HashMap::new(),
        }
    }

    /// Feed one observation for `identity` in `cycle` and return its stable status.
    pub fn observe(&mut self, identity: &HookIdentity, observed: HookStatus, cycle: u64) -> HookStatus {
        let threshold = self.threshold;
        let next = match self.states.get(identity) {
            None => DebounceState::first(observed, cycle),
            Some(prev) => {
                let next = transition(*prev, observed, threshold, cycle);
                if next.stable_status != prev.stable_status {
                    log_debug!(
                        "{identity}: {} -> {} (observed {observed})",
                        prev.stable_status,
                        next.stable_status
                    );
                }
                next
            }
        };

        self.states.insert(identity.clone(), next);
        next.stable_status
    }

    /// Drop hooks absent for more than the configured number of cycles.
    /// Returns how many entries were removed.
    pub fn evict_stale(&mut self, current_cycle: u64) -> usize {
        let limit = self.evict_after_missed_cycles;
        let before = self.states.len();
        self.states
            .retain(|_, state| current_cycle.saturating_sub(state.last_seen_cycle) <= limit);
        let evicted = before - self.states.len();
        if evicted > 0 {
            log_debug!("evicted {evicted} stale hooks at cycle {current_cycle}");
        }
        evicted
    }

    pub fn tracked_hooks(&self) -> usize {
        self.states.len()
    }

    pub fn state_of(&self, identity: &HookIdentity) -> Option<&DebounceState> {
        self.states.get(identity)
    }
}
