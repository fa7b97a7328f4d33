//! Run statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which pruning fallback tier produced the searched pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PruneTier {
    /// Dominance pruning with no pinned sets.
    Aggressive,
    /// Dominance pruning with filtered sets pinned.
    KeepFilteredSets,
    /// The pool was searched as given.
    #[default]
    Unpruned,
}

impl fmt::Display for PruneTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruneTier::Aggressive => write!(f, "Aggressive"),
            PruneTier::KeepFilteredSets => write!(f, "KeepFilteredSets"),
            PruneTier::Unpruned => write!(f, "Unpruned"),
        }
    }
}

/// Counters for one optimization run.
///
/// # Example
///
/// ```
/// use buildforge_solver::stats::OptimizerStats;
///
/// let mut stats = OptimizerStats::default();
/// stats.record_evaluation(true);
/// stats.record_evaluation(false);
///
/// assert_eq!(stats.evaluated, 2);
/// assert_eq!(stats.filtered, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerStats {
    /// Combinations of the unpruned pool.
    pub total_combinations: u64,
    /// Combinations of the pool actually searched.
    pub searched_combinations: u64,
    /// Combinations whose stats were evaluated.
    pub evaluated: u64,
    /// Evaluated combinations rejected by a min or max filter.
    pub filtered: u64,
    /// Scores rejected by the top-k threshold.
    pub threshold_rejected: u64,
    /// Top-k buffer compactions, the final one included.
    pub compactions: u64,
    pub prune_tier: PruneTier,
}

impl OptimizerStats {
    /// Records one evaluation and whether a stat filter rejected it.
    #[inline]
    pub fn record_evaluation(&mut self, rejected_by_filter: bool) {
        self.evaluated += 1;
        if rejected_by_filter {
            self.filtered += 1;
        }
    }

    /// Combinations skipped thanks to pruning.
    pub fn pruned_combinations(&self) -> u64 {
        self.total_combinations
            .saturating_sub(self.searched_combinations)
    }
}
