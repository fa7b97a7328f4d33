//! Dominance pruning of per-slot candidate lists.
//!
//! A candidate can be dropped when another candidate of the same slot is at
//! least as good on every attribute the run reads and carries every set
//! membership that could matter. Pruning is greedy and pairwise, so it may
//! keep more than the Pareto front, but it never drops a candidate that an
//! optimal build needs, provided the objective and filters are monotonic in
//! the relevant attributes.

use std::collections::BTreeSet;
use std::sync::Arc;

use buildforge_core::{AttrKey, Candidate, SetKey, SlotPool, SortDirection};

/// What "at least as good" means for one pruning pass.
#[derive(Debug, Clone, Default)]
pub struct PruneCriteria {
    /// Attributes compared between candidates. Empty disables pruning.
    pub relevant_keys: BTreeSet<AttrKey>,
    /// Sets whose membership must be preserved by a dominating candidate.
    pub relevant_sets: BTreeSet<SetKey>,
    pub direction: SortDirection,
    /// Candidates in any of these sets are never dropped.
    pub always_keep: BTreeSet<SetKey>,
}

impl PruneCriteria {
    pub fn new(relevant_keys: BTreeSet<AttrKey>, direction: SortDirection) -> Self {
        Self {
            relevant_keys,
            direction,
            ..Self::default()
        }
    }

    pub fn with_relevant_sets(mut self, sets: BTreeSet<SetKey>) -> Self {
        self.relevant_sets = sets;
        self
    }

    pub fn with_always_keep(mut self, sets: BTreeSet<SetKey>) -> Self {
        self.always_keep = sets;
        self
    }

    fn is_always_kept(&self, candidate: &Candidate) -> bool {
        candidate
            .sets()
            .iter()
            .any(|set| self.always_keep.contains(set))
    }

    /// Returns true if `better` makes `worse` redundant.
    ///
    /// When maximizing, `better` must hold a superset of `worse`'s relevant
    /// memberships. When minimizing the memberships must match exactly,
    /// since an extra set bonus can only push the value up.
    pub fn dominates(&self, better: &Candidate, worse: &Candidate) -> bool {
        let stats_dominate = self.relevant_keys.iter().all(|key| {
            self.direction
                .at_least_as_good(better.contribution(key), worse.contribution(key))
        });
        if !stats_dominate {
            return false;
        }

        let covers = |a: &Candidate, b: &Candidate| {
            a.sets()
                .iter()
                .filter(|set| self.relevant_sets.contains(*set))
                .all(|set| b.belongs_to(set))
        };
        match self.direction {
            SortDirection::Descending => covers(worse, better),
            SortDirection::Ascending => covers(worse, better) && covers(better, worse),
        }
    }
}

/// Reduces `candidates` to a dominating subset.
///
/// Surviving candidates keep their relative order. Among mutually
/// dominating candidates the earliest one survives.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use std::sync::Arc;
/// use buildforge_core::{Candidate, SortDirection};
/// use buildforge_solver::prune::{prune_candidates, PruneCriteria};
///
/// let candidates = vec![
///     Arc::new(Candidate::new("weak", "flower").with_stat("atk", 10.0)),
///     Arc::new(Candidate::new("strong", "flower").with_stat("atk", 20.0)),
/// ];
/// let keys: BTreeSet<String> = ["atk".to_string()].into_iter().collect();
/// let criteria = PruneCriteria::new(keys, SortDirection::Descending);
///
/// let kept = prune_candidates(&candidates, &criteria);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].id(), "strong");
/// ```
pub fn prune_candidates(
    candidates: &[Arc<Candidate>],
    criteria: &PruneCriteria,
) -> Vec<Arc<Candidate>> {
    if criteria.relevant_keys.is_empty() {
        return candidates.to_vec();
    }

    // (candidate, pinned by always_keep)
    let mut kept: Vec<(Arc<Candidate>, bool)> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let pinned = criteria.is_always_kept(candidate);
        if !pinned
            && kept
                .iter()
                .any(|(other, _)| criteria.dominates(other, candidate))
        {
            continue;
        }
        kept.retain(|(other, other_pinned)| *other_pinned || !criteria.dominates(candidate, other));
        kept.push((Arc::clone(candidate), pinned));
    }
    kept.into_iter().map(|(candidate, _)| candidate).collect()
}

/// Prunes every slot of `pool` independently.
pub fn prune_pool(pool: &SlotPool, criteria: &PruneCriteria) -> SlotPool {
    pool.map_slots(|_, candidates| prune_candidates(candidates, criteria))
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;
