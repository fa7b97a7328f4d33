//! Brute-force oracles.
//!
//! These enumerate the raw cartesian product with no set grouping and no
//! pruning, so they are only usable on tiny pools.

use std::collections::BTreeMap;
use std::sync::Arc;

use buildforge_core::{AttributeBag, Candidate, SetFilter, SlotPool};

/// Every combination of one candidate per slot, in slot key order.
pub fn all_combinations(pool: &SlotPool) -> Vec<Vec<Arc<Candidate>>> {
    let mut combinations: Vec<Vec<Arc<Candidate>>> = vec![Vec::new()];
    for (_, candidates) in pool.slots() {
        let mut next = Vec::with_capacity(combinations.len() * candidates.len());
        for prefix in &combinations {
            for candidate in candidates {
                let mut combination = prefix.clone();
                combination.push(Arc::clone(candidate));
                next.push(combination);
            }
        }
        combinations = next;
    }
    combinations
}

/// Piece count per set key.
pub fn set_counts(pieces: &[Arc<Candidate>]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for piece in pieces {
        for set in piece.sets() {
            *counts.entry(set.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Returns true if the pieces satisfy every set filter.
pub fn satisfies_set_filters(pieces: &[Arc<Candidate>], filters: &[SetFilter]) -> bool {
    let counts = set_counts(pieces);
    filters.iter().all(|filter| {
        filter.is_satisfied_by(counts.get(&filter.set_key).copied().unwrap_or(0))
    })
}

/// Sums the raw contributions of `pieces` on top of `base`.
pub fn sum_stats(base: &AttributeBag, pieces: &[Arc<Candidate>]) -> AttributeBag {
    let mut bag = base.clone();
    for piece in pieces {
        bag.add_all(piece.stats());
    }
    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::two_slot_atk_pool;

    #[test]
    fn all_combinations_is_full_product() {
        let combos = all_combinations(&two_slot_atk_pool());
        assert_eq!(combos.len(), 4);

        let mut sums: Vec<f64> = combos
            .iter()
            .map(|c| sum_stats(&AttributeBag::new(), c).get("atk"))
            .collect();
        sums.sort_by(f64::total_cmp);
        assert_eq!(sums, vec![15.0, 25.0, 25.0, 35.0]);
    }

    #[test]
    fn empty_pool_has_one_empty_combination() {
        let combos = all_combinations(&SlotPool::new());
        assert_eq!(combos.len(), 1);
        assert!(combos[0].is_empty());
    }

    #[test]
    fn set_filters_count_pieces() {
        let pieces = vec![
            Arc::new(Candidate::new("a", "flower").with_set("x")),
            Arc::new(Candidate::new("b", "plume").with_set("x")),
        ];

        assert!(satisfies_set_filters(&pieces, &[SetFilter::new("x", 2)]));
        assert!(!satisfies_set_filters(&pieces, &[SetFilter::new("x", 3)]));
        assert!(!satisfies_set_filters(&pieces, &[SetFilter::new("y", 1)]));
    }
}
