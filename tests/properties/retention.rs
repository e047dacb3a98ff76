//! Property tests for release retention.

use proptest::prelude::*;

use capstan::domain::services::{cleanup_candidates, rollback_candidates};
use capstan::Release;

fn releases(count: usize) -> Vec<Release> {
    (0..count)
        .map(|i| Release::new(format!("/srv/app/releases/r{:03}", i)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: cleanup removes only the oldest releases and never the live one.
    #[test]
    fn property_cleanup_removes_oldest_prefix(
        count in 0usize..=20,
        keep in 0usize..=10,
    ) {
        let all = releases(count);
        let doomed = cleanup_candidates(&all, keep);

        prop_assert!(doomed.len() <= count.saturating_sub(1));
        prop_assert_eq!(doomed, &all[..doomed.len()]);
        if let Some(live) = all.last() {
            prop_assert!(!doomed.contains(live));
        }
        prop_assert_eq!(count - doomed.len(), count.min(keep + 1));
    }

    /// PROPERTY: rolling back removes only releases newer than the target.
    #[test]
    fn property_rollback_spares_target_and_older(
        count in 1usize..=20,
        target_seed in any::<usize>(),
        keep in 0usize..=10,
    ) {
        let all = releases(count);
        let target = target_seed % count;
        let doomed = rollback_candidates(&all, target, keep);

        for release in doomed {
            let index = all.iter().position(|r| r == release).unwrap();
            prop_assert!(index > target);
            prop_assert!(index < count.saturating_sub(keep));
        }
        prop_assert!(!doomed.contains(&all[target]));
    }

    /// PROPERTY: the newest `keep` releases survive a rollback.
    #[test]
    fn property_rollback_keeps_newest_window(
        count in 1usize..=20,
        target_seed in any::<usize>(),
        keep in 0usize..=10,
    ) {
        let all = releases(count);
        let target = target_seed % count;
        let doomed = rollback_candidates(&all, target, keep);

        let window = &all[count.saturating_sub(keep)..];
        for release in window {
            prop_assert!(!doomed.contains(release));
        }
        let expected = count.saturating_sub(keep).saturating_sub(target + 1);
        prop_assert_eq!(doomed.len(), expected);
    }
}
