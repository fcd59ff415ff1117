use std::collections::BTreeMap;

use super::models::{BerthGroup, BollardGroup, ClassifiedHook, GroupCounts, StatusSummary};

/// Bucket for hooks whose berth or bollard name is missing.
pub const UNKNOWN_GROUP: &str = "unknown";

fn group_name(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or(UNKNOWN_GROUP)
}

/// Group one poll's hooks by berth then bollard and count stable statuses at
/// every scope. Keys come out sorted so repeated polls render identically.
pub fn aggregate(hooks: &[ClassifiedHook]) -> StatusSummary {
    let mut tree: BTreeMap<&str, BTreeMap<&str, Vec<usize>>> = BTreeMap::new();
    let mut global = GroupCounts::default();

    for (index, hook) in hooks.iter().enumerate() {
        global.record(hook.stable_status);
        let identity = hook.identity();
        tree.entry(group_name(&identity.berth_name))
            .or_default()
            .entry(group_name(&identity.bollard_name))
            .or_default()
            .push(index);
    }

    let berths = tree
        .into_iter()
        .map(|(berth_name, bollards)| {
            let mut berth_counts = GroupCounts::default();
            let bollards = bollards
                .into_iter()
                .map(|(bollard_name, mut indices)| {
                    // stable sort keeps payload order among equal hook names
                    indices.sort_by(|a, b| {
                        group_name(&hooks[*a].identity().hook_name)
                            .cmp(&group_name(&hooks[*b].identity().hook_name))
                    });

                    let mut counts = GroupCounts::default();
                    for &index in &indices {
                        counts.record(hooks[index].stable_status);
                        berth_counts.record(hooks[index].stable_status);
                    }

                    BollardGroup {
                        name: bollard_name.to_string(),
                        counts,
                        hooks: indices,
                    }
                })
                .collect();

            BerthGroup {
                name: berth_name.to_string(),
                counts: berth_counts,
                bollards,
            }
        })
        .collect();

    StatusSummary { global, berths }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::HookStatus::{self, *};
    use crate::readings::{HookIdentity, HookReading};

    fn hook(berth: Option<&str>, bollard: Option<&str>, name: &str, status: HookStatus) -> ClassifiedHook {
        let identity = HookIdentity {
            port_name: Some("Fremantle".into()),
            berth_name: berth.map(str::to_string),
            bollard_name: bollard.map(str::to_string),
            hook_name: Some(name.to_string()),
        };
        ClassifiedHook::new(HookReading::empty(identity), status, status)
    }

    fn sample() -> Vec<ClassifiedHook> {
        vec![
            hook(Some("Berth B"), Some("BOL002"), "Hook 2", Critical),
            hook(Some("Berth A"), Some("BOL001"), "Hook 1", Normal),
            hook(Some("Berth B"), Some("BOL001"), "Hook 1", Attention),
            hook(None, Some("BOL009"), "Hook 1", Unknown),
            hook(Some("Berth B"), None, "Hook 3", Normal),
            hook(Some("Berth B"), Some("BOL002"), "Hook 1", Normal),
        ]
    }

    #[test]
    fn counts_are_exhaustive_and_disjoint() {
        let summary = aggregate(&sample());
        let g = summary.global;
        assert_eq!(g.total, 6);
        assert_eq!(g.critical + g.attention + g.normal + g.unknown, g.total);
        assert_eq!((g.critical, g.attention, g.normal, g.unknown), (1, 1, 3, 1));

        for berth in &summary.berths {
            let c = berth.counts;
            assert_eq!(c.critical + c.attention + c.normal + c.unknown, c.total);
            let bollard_total: usize = berth.bollards.iter().map(|b| b.counts.total).sum();
            assert_eq!(bollard_total, c.total);
        }
    }

    #[test]
    fn groups_are_sorted_and_missing_names_bucketed() {
        let summary = aggregate(&sample());
        let berth_names: Vec<_> = summary.berths.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(berth_names, vec!["Berth A", "Berth B", "unknown"]);

        let berth_b = summary.berth("Berth B").unwrap();
        let bollard_names: Vec<_> = berth_b.bollards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(bollard_names, vec!["BOL001", "BOL002", "unknown"]);
        assert_eq!(berth_b.counts.total, 4);
        assert_eq!(berth_b.counts.worst_status(), Some(Critical));

        let orphan = summary.berth(UNKNOWN_GROUP).unwrap();
        assert_eq!(orphan.counts.unknown, 1);
        assert_eq!(orphan.counts.normal, 0);
    }

    #[test]
    fn hooks_within_bollard_sorted_by_name() {
        let hooks = sample();
        let summary = aggregate(&hooks);
        let bollard = summary.berth("Berth B").unwrap().bollard("BOL002").unwrap();
        let names: Vec<_> = bollard
            .hooks
            .iter()
            .map(|&i| hooks[i].identity().hook_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Hook 1", "Hook 2"]);
        assert_eq!(bollard.counts.worst_status(), Some(Critical));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let hooks = sample();
        assert_eq!(aggregate(&hooks), aggregate(&hooks));
    }

    #[test]
    fn counts_use_stable_not_observed_status() {
        let mut h = hook(Some("Berth A"), Some("BOL001"), "Hook 1", Attention);
        h.observed_status = Critical;
        let summary = aggregate(&[h]);
        assert_eq!(summary.global.critical, 0);
        assert_eq!(summary.global.attention, 1);
    }

    #[test]
    fn empty_poll_has_empty_summary() {
        let summary = aggregate(&[]);
        assert_eq!(summary, StatusSummary::default());
        assert_eq!(summary.global.worst_status(), None);
    }
}
