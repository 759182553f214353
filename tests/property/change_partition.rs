use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use wffbuild::changes::{classify, ChangeKind};

// Small key and fingerprint alphabets so that overlaps and collisions are common.
fn state_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    proptest::collection::btree_map(
        "raw/[a-e]\\.xml",
        "[01]",
        0..6,
    )
}

proptest! {
    #[test]
    fn classes_partition_the_union(current in state_strategy(), previous in state_strategy()) {
        let classified = classify(&current, &previous);

        let union: BTreeSet<&String> = current.keys().chain(previous.keys()).collect();
        let seen: Vec<&String> = classified.iter().map(|(k, _)| k).collect();
        let seen_set: BTreeSet<&String> = seen.iter().copied().collect();

        // Every path exactly once, in order.
        prop_assert_eq!(seen.len(), union.len());
        prop_assert_eq!(&seen_set, &union);
        prop_assert!(seen.windows(2).all(|w| w[0] < w[1]));

        for (key, kind) in &classified {
            let expected = match (current.get(key), previous.get(key)) {
                (Some(_), None) => ChangeKind::Added,
                (None, Some(_)) => ChangeKind::Removed,
                (Some(a), Some(b)) if a != b => ChangeKind::Modified,
                (Some(_), Some(_)) => ChangeKind::Unchanged,
                (None, None) => unreachable!(),
            };
            prop_assert_eq!(*kind, expected);
        }
    }

    #[test]
    fn unchanged_state_has_nothing_to_process(state in state_strategy()) {
        let classified = classify(&state, &state);
        prop_assert!(classified.iter().all(|(_, kind)| *kind == ChangeKind::Unchanged));
        prop_assert!(classified.iter().all(|(_, kind)| !kind.needs_processing()));
    }
}
