//! Property tests for the assignment solver and the match engine.

use std::collections::BTreeSet;

use proptest::prelude::*;

use listmatch_map::{AssignmentSolver, HungarianSolver, MatchEngine, RewardMatrix};
use listmatch_model::{LockSet, MatchOptions};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..=5, 1usize..=5).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(
            proptest::collection::vec((0u8..=100).prop_map(f64::from), cols),
            rows,
        )
    })
}

/// Distinct labels, so value-based bookkeeping equals per-item bookkeeping.
fn arb_list() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::btree_set(r"[a-d]{1,5}( [a-d]{1,3})?", 1..=6)
        .prop_map(|set| set.into_iter().collect())
}

/// Best achievable total by exhaustive search.
fn brute_force(rewards: &[Vec<f64>]) -> f64 {
    fn search(rewards: &[Vec<f64>], row: usize, used: &mut [bool]) -> f64 {
        if row == rewards.len() {
            return 0.0;
        }
        // A row may stay unassigned when there are more rows than columns.
        let mut best = search(rewards, row + 1, used);
        for col in 0..used.len() {
            if used[col] {
                continue;
            }
            used[col] = true;
            best = best.max(rewards[row][col] + search(rewards, row + 1, used));
            used[col] = false;
        }
        best
    }
    let cols = rewards.first().map_or(0, Vec::len);
    search(rewards, 0, &mut vec![false; cols])
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn solver_total_is_optimal(rows in arb_matrix()) {
        let expected = brute_force(&rows);
        let rewards = RewardMatrix::from_rows(rows).unwrap();
        let assignment = HungarianSolver.solve(&rewards).unwrap();

        prop_assert_eq!(assignment.total(&rewards), expected);
        prop_assert_eq!(assignment.len(), rewards.rows().min(rewards.cols()));
        let cols: BTreeSet<usize> = assignment.iter().map(|(_, col)| col).collect();
        prop_assert_eq!(cols.len(), assignment.len());
        prop_assert!(
            assignment
                .iter()
                .all(|(row, col)| row < rewards.rows() && col < rewards.cols())
        );
    }

    #[test]
    fn unfiltered_match_covers_the_shorter_list(list_a in arb_list(), list_b in arb_list()) {
        let engine = MatchEngine::with_defaults();
        let result = engine
            .match_lists(&list_a, &list_b, &LockSet::new(), &MatchOptions::unfiltered())
            .unwrap();

        prop_assert_eq!(result.matches.len(), list_a.len().min(list_b.len()));
        let sources: BTreeSet<&str> = result.matches.iter().map(|m| m.source.as_str()).collect();
        let targets: BTreeSet<&str> = result.matches.iter().map(|m| m.target.as_str()).collect();
        prop_assert_eq!(sources.len(), result.matches.len());
        prop_assert_eq!(targets.len(), result.matches.len());
        prop_assert_eq!(
            result.unmatched_source.len() + result.matches.len(),
            list_a.len()
        );
        prop_assert_eq!(
            result.unmatched_target.len() + result.matches.len(),
            list_b.len()
        );
    }

    #[test]
    fn locks_always_survive(
        list_a in arb_list(),
        list_b in arb_list(),
        threshold in 0.0f64..=101.0,
    ) {
        let mut locks = LockSet::new();
        locks.add_lock(list_a[0].clone(), list_b[0].clone()).unwrap();
        let options = MatchOptions::default().with_threshold(Some(threshold));

        let result = MatchEngine::with_defaults()
            .match_lists(&list_a, &list_b, &locks, &options)
            .unwrap();

        let manual: Vec<_> = result.matches.iter().filter(|m| m.is_manual).collect();
        prop_assert_eq!(manual.len(), 1);
        prop_assert_eq!(&manual[0].source, &list_a[0]);
        prop_assert_eq!(&manual[0].target, &list_b[0]);
        prop_assert_eq!(manual[0].score, 100);

        for m in result.matches.iter().filter(|m| !m.is_manual) {
            prop_assert!(m.source != list_a[0]);
            prop_assert!(m.target != list_b[0]);
            prop_assert!(f64::from(m.score) >= threshold);
        }

        // Every item is either matched or reported unmatched, never both.
        let sources: BTreeSet<&str> = result.matches.iter().map(|m| m.source.as_str()).collect();
        let targets: BTreeSet<&str> = result.matches.iter().map(|m| m.target.as_str()).collect();
        for item in &list_a {
            let unmatched = result.unmatched_source.contains(item);
            prop_assert!(sources.contains(item.as_str()) != unmatched, "{}", item);
        }
        for item in &list_b {
            let unmatched = result.unmatched_target.contains(item);
            prop_assert!(targets.contains(item.as_str()) != unmatched, "{}", item);
        }
        prop_assert_eq!(
            result.unmatched_source.len() + sources.len(),
            list_a.len()
        );
        prop_assert_eq!(
            result.unmatched_target.len() + targets.len(),
            list_b.len()
        );
    }

    #[test]
    fn matches_are_sorted_by_score(list_a in arb_list(), list_b in arb_list()) {
        let result = MatchEngine::with_defaults()
            .match_lists(&list_a, &list_b, &LockSet::new(), &MatchOptions::unfiltered())
            .unwrap();
        prop_assert!(result.matches.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn raising_the_threshold_only_removes_matches(
        list_a in arb_list(),
        list_b in arb_list(),
        low in 0.0f64..=100.0,
        raise in 0.0f64..=50.0,
    ) {
        let engine = MatchEngine::with_defaults();
        let lenient_options = MatchOptions::default().with_threshold(Some(low));
        let strict_options = MatchOptions::default().with_threshold(Some(low + raise));
        let lenient = engine
            .match_lists(&list_a, &list_b, &LockSet::new(), &lenient_options)
            .unwrap();
        let strict = engine
            .match_lists(&list_a, &list_b, &LockSet::new(), &strict_options)
            .unwrap();

        prop_assert!(strict.matches.len() <= lenient.matches.len());
        for m in &strict.matches {
            prop_assert!(lenient.matches.contains(m));
        }
    }

    #[test]
    fn repeated_runs_are_identical(list_a in arb_list(), list_b in arb_list()) {
        let engine = MatchEngine::with_defaults();
        let options = MatchOptions::default();
        let first = engine.match_lists(&list_a, &list_b, &LockSet::new(), &options).unwrap();
        let second = engine.match_lists(&list_a, &list_b, &LockSet::new(), &options).unwrap();
        prop_assert_eq!(first, second);
    }
}
