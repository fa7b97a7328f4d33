//! Request and result messages of an optimization run.

use std::sync::Arc;
use std::time::Duration;

use buildforge_core::{
    Candidate, InitialStats, Objective, SetEffects, SetFilter, SlotPool, SortDirection, StatBounds,
};
use serde::{Deserialize, Serialize};

use crate::stats::OptimizerStats;

/// Everything one optimization run needs.
///
/// # Examples
///
/// ```
/// use buildforge_core::{InitialStats, Objective, SetFilter};
/// use buildforge_solver::OptimizeRequest;
/// use buildforge_test::two_slot_atk_pool;
///
/// let request = OptimizeRequest::new(
///     two_slot_atk_pool(),
///     InitialStats::new("hutao"),
///     Objective::attribute("atk"),
/// )
/// .with_set_filter(SetFilter::new("gladiator", 2))
/// .with_min("atk", 30.0)
/// .with_max_results(5);
///
/// assert_eq!(request.max_results, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub pools: SlotPool,
    #[serde(default)]
    pub set_filters: Vec<SetFilter>,
    #[serde(default)]
    pub min_filters: StatBounds,
    #[serde(default)]
    pub max_filters: StatBounds,
    pub initial_stats: InitialStats,
    #[serde(default)]
    pub set_effects: SetEffects,
    pub objective: Objective,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default)]
    pub ascending: bool,
}

fn default_max_results() -> usize {
    10
}

impl OptimizeRequest {
    /// Creates a descending request for the 10 best builds, with no filters.
    pub fn new(pools: SlotPool, initial_stats: InitialStats, objective: Objective) -> Self {
        Self {
            pools,
            set_filters: Vec::new(),
            min_filters: StatBounds::new(),
            max_filters: StatBounds::new(),
            initial_stats,
            set_effects: SetEffects::new(),
            objective,
            max_results: default_max_results(),
            ascending: false,
        }
    }

    pub fn with_set_filter(mut self, filter: SetFilter) -> Self {
        self.set_filters.push(filter);
        self
    }

    /// Rejects builds whose `key` ends below `bound`.
    pub fn with_min(mut self, key: impl Into<String>, bound: f64) -> Self {
        self.min_filters.insert(key.into(), bound);
        self
    }

    /// Rejects builds whose `key` ends above `bound`.
    pub fn with_max(mut self, key: impl Into<String>, bound: f64) -> Self {
        self.max_filters.insert(key.into(), bound);
        self
    }

    pub fn with_set_effects(mut self, set_effects: SetEffects) -> Self {
        self.set_effects = set_effects;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    pub fn direction(&self) -> SortDirection {
        SortDirection::from_ascending(self.ascending)
    }
}

/// One selected build: a piece per slot and its objective value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    /// Pieces in slot key order.
    pub pieces: Vec<Arc<Candidate>>,
    /// Objective value, unsigned.
    pub value: f64,
}

impl Build {
    /// The piece equipped in `slot`.
    pub fn piece(&self, slot: &str) -> Option<&Arc<Candidate>> {
        self.pieces.iter().find(|p| p.slot() == slot)
    }

    pub fn piece_ids(&self) -> Vec<&str> {
        self.pieces.iter().map(|p| p.id()).collect()
    }
}

/// Periodic progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Combinations accounted for so far, pruned ones included.
    pub processed: u64,
    pub elapsed: Duration,
}

impl ProgressUpdate {
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Final result of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildOutcome {
    /// Best builds first.
    pub builds: Vec<Build>,
    pub elapsed: Duration,
    /// True when a termination stopped the search before it was exhaustive.
    pub terminated_early: bool,
    pub stats: OptimizerStats,
}

impl BuildOutcome {
    /// An empty, zero-time result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn best(&self) -> Option<&Build> {
        self.builds.first()
    }
}

/// Messages emitted by a run, in order: zero or more `Progress`, then
/// exactly one `Finished` or `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerMessage {
    Progress(ProgressUpdate),
    Finished(BuildOutcome),
    Failed { reason: String },
}

impl OptimizerMessage {
    /// Returns true for `Finished` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OptimizerMessage::Progress(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults_from_json() {
        let request: OptimizeRequest = serde_json::from_value(json!({
            "pools": {
                "flower": [{ "id": "f1", "slot": "flower", "stats": { "atk": 10.0 } }],
                "plume": [{ "id": "p1", "slot": "plume", "sets": ["gladiator"] }]
            },
            "initial_stats": { "character_key": "hutao" },
            "objective": "atk"
        }))
        .unwrap();

        assert_eq!(request.pools.slot_count(), 2);
        assert_eq!(request.objective, Objective::attribute("atk"));
        assert_eq!(request.max_results, 10);
        assert!(request.set_filters.is_empty());
        assert_eq!(request.direction(), SortDirection::Descending);
    }

    #[test]
    fn test_formula_objective_from_json() {
        let objective: Objective =
            serde_json::from_value(json!({ "talent": "charged", "formula": "avg_dmg" })).unwrap();
        assert_eq!(objective, Objective::formula("charged", "avg_dmg"));
    }

    #[test]
    fn test_messages_are_tagged() {
        let failed = serde_json::to_value(OptimizerMessage::Failed {
            reason: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(failed, json!({ "type": "failed", "reason": "boom" }));

        let progress = serde_json::to_value(OptimizerMessage::Progress(ProgressUpdate {
            processed: 7,
            elapsed: Duration::ZERO,
        }))
        .unwrap();
        assert_eq!(progress["type"], "progress");
        assert_eq!(progress["processed"], 7);
    }

    #[test]
    fn test_terminal_messages() {
        assert!(OptimizerMessage::Finished(BuildOutcome::empty()).is_terminal());
        assert!(!OptimizerMessage::Progress(ProgressUpdate {
            processed: 0,
            elapsed: Duration::ZERO,
        })
        .is_terminal());
        assert!(BuildOutcome::empty().best().is_none());
    }
}
