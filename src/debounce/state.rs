use serde::Serialize;

use crate::classification::HookStatus;

/// Rolling debounce state for one hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebounceState {
    pub last_observed: HookStatus,
    /// Consecutive polls with `last_observed`, capped at the threshold
    pub consecutive_count: u32,
    pub stable_status: HookStatus,
    /// Successful cycle in which the hook was last present
    pub last_seen_cycle: u64,
}

impl DebounceState {
    pub fn first(observed: HookStatus, cycle: u64) -> Self {
        Self {
            last_observed: observed,
            consecutive_count: 1,
            stable_status: observed,
            last_seen_cycle: cycle,
        }
    }
}

/// Advance one hook's state by one poll.
///
/// Any change that touches a calm status (normal/unknown) on either side is
/// applied at once. A change between the two alert statuses waits until the
/// new status has been observed `threshold` polls in a row.
pub fn transition(
    state: DebounceState,
    observed: HookStatus,
    threshold: u32,
    cycle: u64,
) -> DebounceState {
    let threshold = threshold.max(1);

    let consecutive_count = if observed == state.last_observed {
        state.consecutive_count.saturating_add(1).min(threshold)
    } else {
        1
    };

    let stable_status = if observed == state.stable_status {
        state.stable_status
    } else if !state.stable_status.is_alert() || !observed.is_alert() {
        observed
    } else if consecutive_count >= threshold {
        observed
    } else {
        state.stable_status
    };

    DebounceState {
        last_observed: observed,
        consecutive_count,
        stable_status,
        last_seen_cycle: cycle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HookStatus::*;

    fn run(sequence: &[HookStatus], threshold: u32) -> Vec<HookStatus> {
        let mut state: Option<DebounceState> = None;
        sequence
            .iter()
            .enumerate()
            .map(|(cycle, &observed)| {
                let next = match state {
                    None => DebounceState::first(observed, cycle as u64),
                    Some(prev) => transition(prev, observed, threshold, cycle as u64),
                };
                state = Some(next);
                next.stable_status
            })
            .collect()
    }

    #[test]
    fn alert_to_alert_needs_threshold_polls() {
        assert_eq!(
            run(&[Attention, Critical, Critical], 2),
            vec![Attention, Attention, Critical]
        );
    }

    #[test]
    fn single_blip_between_alerts_is_suppressed() {
        assert_eq!(
            run(&[Critical, Attention, Critical, Attention, Critical], 2),
            vec![Critical; 5]
        );
    }

    #[test]
    fn calm_edges_are_immediate() {
        assert_eq!(run(&[Critical, Normal], 2), vec![Critical, Normal]);
        assert_eq!(run(&[Normal, Critical], 2), vec![Normal, Critical]);
        assert_eq!(run(&[Unknown, Attention], 2), vec![Unknown, Attention]);
        assert_eq!(run(&[Attention, Unknown], 2), vec![Attention, Unknown]);
        assert_eq!(run(&[Normal, Unknown, Normal], 2), vec![Normal, Unknown, Normal]);
    }

    #[test]
    fn higher_threshold_waits_longer() {
        assert_eq!(
            run(&[Attention, Critical, Critical, Critical], 3),
            vec![Attention, Attention, Attention, Critical]
        );
    }

    #[test]
    fn zero_threshold_behaves_like_one() {
        assert_eq!(run(&[Attention, Critical], 0), vec![Attention, Critical]);
    }

    #[test]
    fn count_saturates_at_threshold() {
        let mut state = DebounceState::first(Normal, 0);
        for cycle in 1..10 {
            state = transition(state, Normal, 2, cycle);
        }
        assert_eq!(state.consecutive_count, 2);
        assert_eq!(state.last_seen_cycle, 9);
    }

    #[test]
    fn count_resets_on_change() {
        let state = DebounceState::first(Critical, 0);
        let state = transition(state, Critical, 2, 1);
        let state = transition(state, Attention, 2, 2);
        assert_eq!(state.consecutive_count, 1);
        assert_eq!(state.last_observed, Attention);
        assert_eq!(state.stable_status, Critical);
    }
}
