//! Tests for dominance pruning.

use super::*;
use buildforge_core::{AttributeBag, SetFilter};
use buildforge_test::oracle::{all_combinations, satisfies_set_filters, sum_stats};
use buildforge_test::RandomPoolSpec;

fn keys(names: &[&str]) -> BTreeSet<AttrKey> {
    names.iter().map(|s| s.to_string()).collect()
}

fn candidate(id: &str, atk: f64, hp: f64) -> Arc<Candidate> {
    Arc::new(
        Candidate::new(id, "flower")
            .with_stat("atk", atk)
            .with_stat("hp", hp),
    )
}

fn ids(candidates: &[Arc<Candidate>]) -> Vec<&str> {
    candidates.iter().map(|c| c.id()).collect()
}

#[test]
fn test_empty_keys_is_noop() {
    let candidates = vec![candidate("a", 1.0, 1.0), candidate("b", 2.0, 2.0)];
    let criteria = PruneCriteria::new(BTreeSet::new(), SortDirection::Descending);

    assert_eq!(ids(&prune_candidates(&candidates, &criteria)), vec!["a", "b"]);
}

#[test]
fn test_keeps_incomparable_candidates() {
    let candidates = vec![
        candidate("atk-heavy", 20.0, 1.0),
        candidate("hp-heavy", 1.0, 20.0),
        candidate("dominated", 1.0, 1.0),
    ];
    let criteria = PruneCriteria::new(keys(&["atk", "hp"]), SortDirection::Descending);

    assert_eq!(
        ids(&prune_candidates(&candidates, &criteria)),
        vec!["atk-heavy", "hp-heavy"]
    );
}

#[test]
fn test_ignores_irrelevant_keys() {
    let candidates = vec![candidate("low-hp", 10.0, 1.0), candidate("high-hp", 10.0, 99.0)];
    let criteria = PruneCriteria::new(keys(&["atk"]), SortDirection::Descending);

    // Equal on atk: the first one wins.
    assert_eq!(ids(&prune_candidates(&candidates, &criteria)), vec!["low-hp"]);
}

#[test]
fn test_later_candidate_evicts_earlier() {
    let candidates = vec![candidate("weak", 1.0, 1.0), candidate("strong", 5.0, 5.0)];
    let criteria = PruneCriteria::new(keys(&["atk", "hp"]), SortDirection::Descending);

    assert_eq!(ids(&prune_candidates(&candidates, &criteria)), vec!["strong"]);
}

#[test]
fn test_ascending_keeps_smallest() {
    let candidates = vec![candidate("big", 9.0, 9.0), candidate("small", 2.0, 3.0)];
    let criteria = PruneCriteria::new(keys(&["atk", "hp"]), SortDirection::Ascending);

    assert_eq!(ids(&prune_candidates(&candidates, &criteria)), vec!["small"]);
}

#[test]
fn test_missing_stat_counts_as_zero() {
    let candidates = vec![
        Arc::new(Candidate::new("empty", "flower")),
        candidate("some", 1.0, 0.0),
    ];
    let criteria = PruneCriteria::new(keys(&["atk"]), SortDirection::Descending);

    assert_eq!(ids(&prune_candidates(&candidates, &criteria)), vec!["some"]);
}

#[test]
fn test_relevant_set_membership_must_be_covered() {
    let in_set = Arc::new(
        Candidate::new("glad", "flower")
            .with_set("gladiator")
            .with_stat("atk", 5.0),
    );
    let off_set = Arc::new(
        Candidate::new("other", "flower")
            .with_set("wanderer")
            .with_stat("atk", 50.0),
    );
    let candidates = vec![in_set, off_set];

    let criteria = PruneCriteria::new(keys(&["atk"]), SortDirection::Descending)
        .with_relevant_sets(keys(&["gladiator"]));
    assert_eq!(ids(&prune_candidates(&candidates, &criteria)), vec!["glad", "other"]);

    // Without the set being relevant, the stronger piece wins.
    let criteria = PruneCriteria::new(keys(&["atk"]), SortDirection::Descending);
    assert_eq!(ids(&prune_candidates(&candidates, &criteria)), vec!["other"]);
}

#[test]
fn test_superset_membership_dominates_when_maximizing() {
    let plain = Arc::new(Candidate::new("plain", "flower").with_stat("atk", 5.0));
    let in_set = Arc::new(
        Candidate::new("glad", "flower")
            .with_set("gladiator")
            .with_stat("atk", 5.0),
    );
    let candidates = vec![plain, in_set];
    let relevant = keys(&["gladiator"]);

    let maximize = PruneCriteria::new(keys(&["atk"]), SortDirection::Descending)
        .with_relevant_sets(relevant.clone());
    assert_eq!(ids(&prune_candidates(&candidates, &maximize)), vec!["glad"]);

    let minimize = PruneCriteria::new(keys(&["atk"]), SortDirection::Ascending)
        .with_relevant_sets(relevant);
    assert_eq!(ids(&prune_candidates(&candidates, &minimize)), vec!["plain", "glad"]);
}

#[test]
fn test_always_keep_pins_candidates() {
    let weak = Arc::new(
        Candidate::new("weak-glad", "flower")
            .with_set("gladiator")
            .with_stat("atk", 1.0),
    );
    let strong = candidate("strong", 10.0, 0.0);
    let candidates = vec![weak, strong];

    let criteria = PruneCriteria::new(keys(&["atk"]), SortDirection::Descending)
        .with_always_keep(keys(&["gladiator"]));
    assert_eq!(
        ids(&prune_candidates(&candidates, &criteria)),
        vec!["weak-glad", "strong"]
    );
}

#[test]
fn test_prune_pool_prunes_each_slot() {
    let pool = buildforge_test::two_slot_atk_pool();
    let criteria = PruneCriteria::new(keys(&["atk"]), SortDirection::Descending);

    let pruned = prune_pool(&pool, &criteria);
    assert_eq!(ids(pruned.get("flower").unwrap()), vec!["flower-20"]);
    assert_eq!(ids(pruned.get("plume").unwrap()), vec!["plume-15"]);
}

fn best_value<F>(pool: &SlotPool, filters: &[SetFilter], direction: SortDirection, objective: F) -> Option<f64>
where
    F: Fn(&AttributeBag) -> f64,
{
    all_combinations(pool)
        .iter()
        .filter(|pieces| satisfies_set_filters(pieces, filters))
        .map(|pieces| direction.signed(objective(&sum_stats(&AttributeBag::new(), pieces))))
        .max_by(f64::total_cmp)
}

#[test]
fn test_pruning_preserves_optimum_on_random_pools() {
    let objective = |bag: &AttributeBag| bag.get("atk") + 0.5 * bag.get("hp");

    for seed in 0..40 {
        let pool = RandomPoolSpec::new(seed)
            .with_slots(3)
            .with_candidates_per_slot(5)
            .generate();
        let filters = if seed % 2 == 0 {
            vec![SetFilter::new("gladiator", 2)]
        } else {
            Vec::new()
        };
        let filter_sets: BTreeSet<SetKey> = filters.iter().map(|f| f.set_key.clone()).collect();

        for direction in [SortDirection::Descending, SortDirection::Ascending] {
            let criteria = PruneCriteria::new(keys(&["atk", "hp"]), direction)
                .with_relevant_sets(filter_sets.clone());
            let pruned = prune_pool(&pool, &criteria);

            assert!(pruned.candidate_count() <= pool.candidate_count());
            assert_eq!(
                best_value(&pruned, &filters, direction, objective),
                best_value(&pool, &filters, direction, objective),
                "seed {seed}, {direction}"
            );
        }
    }
}
