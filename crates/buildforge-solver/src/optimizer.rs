//! The evaluation loop.
//!
//! Logging levels:
//! - **INFO**: Run start/end, problem scale, early termination
//! - **DEBUG**: Pruning tiers and top-k compactions
//! - **TRACE**: Set-level configurations as they are entered

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use buildforge_config::OptimizerConfig;
use buildforge_core::{
    AttrKey, AttributeBag, BuildForgeError, DependencyResolver, Result, SetKey, SortDirection,
    StatEvaluator,
};
use smallvec::SmallVec;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::enumerate::{BuildEnumerator, SetPartition, SetSignatures};
use crate::message::{Build, BuildOutcome, OptimizeRequest, OptimizerMessage, ProgressUpdate};
use crate::objective::{FormulaRegistry, ResolvedObjective};
use crate::prune::{prune_pool, PruneCriteria};
use crate::scope::SearchScope;
use crate::stats::{OptimizerStats, PruneTier};
use crate::termination::{
    CancellationToken, ExternalTermination, OrTermination, Termination, TimeTermination,
};
use crate::top_k::TopKSelector;

/// Runs exhaustive build searches.
///
/// The optimizer is stateless between runs and can be shared across
/// threads.
///
/// # Examples
///
/// ```
/// use buildforge_core::{InitialStats, Objective};
/// use buildforge_solver::{BuildOptimizer, FormulaRegistry, OptimizeRequest};
/// use buildforge_test::two_slot_atk_pool;
///
/// let optimizer = BuildOptimizer::new(FormulaRegistry::new());
/// let request = OptimizeRequest::new(
///     two_slot_atk_pool(),
///     InitialStats::new("hutao"),
///     Objective::attribute("atk"),
/// )
/// .with_max_results(2);
///
/// let outcome = optimizer.optimize(&request).unwrap();
/// let values: Vec<f64> = outcome.builds.iter().map(|b| b.value).collect();
/// assert_eq!(values, vec![35.0, 25.0]);
/// ```
#[derive(Debug, Clone)]
pub struct BuildOptimizer {
    config: OptimizerConfig,
    registry: Arc<FormulaRegistry>,
}

impl BuildOptimizer {
    /// Creates an optimizer with the default configuration.
    pub fn new(registry: FormulaRegistry) -> Self {
        Self {
            config: OptimizerConfig::default(),
            registry: Arc::new(registry),
        }
    }

    /// Creates an optimizer configured from a TOML file, falling back to
    /// defaults when the file is missing or invalid.
    pub fn from_config_file(path: impl AsRef<Path>, registry: FormulaRegistry) -> Self {
        Self::new(registry).with_config(OptimizerConfig::load(path).unwrap_or_default())
    }

    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    /// Runs a search to completion and returns its outcome.
    pub fn optimize(&self, request: &OptimizeRequest) -> Result<BuildOutcome> {
        // Create a channel but ignore the receiver - no streaming needed
        let (sender, _receiver) = mpsc::unbounded_channel();
        self.optimize_with_channel(request, &sender, None)
    }

    /// Runs a search, streaming progress and the final outcome to `sender`.
    ///
    /// Every successful run ends with exactly one
    /// [`OptimizerMessage::Finished`], which carries the returned outcome.
    /// When `cancel` fires, the builds found so far are returned with
    /// `terminated_early` set.
    ///
    /// # Errors
    ///
    /// Returns an error, without sending a terminal message, when
    /// `max_results` is zero, more than 64 sets are filtered, or the
    /// modifier graph has a cycle.
    pub fn optimize_with_channel(
        &self,
        request: &OptimizeRequest,
        sender: &mpsc::UnboundedSender<OptimizerMessage>,
        cancel: Option<&CancellationToken>,
    ) -> Result<BuildOutcome> {
        let mut scope = SearchScope::start(0);

        if request.max_results == 0 {
            return Err(BuildForgeError::InvalidRequest(
                "max_results must be positive".to_string(),
            ));
        }
        let direction = request.direction();
        let stats = &request.initial_stats;

        let Some(objective) = ResolvedObjective::resolve(&request.objective, stats, &self.registry)
        else {
            info!(
                event = "objective_unresolved",
                character = %stats.character_key,
                objective = ?request.objective,
            );
            emit(
                sender,
                OptimizerMessage::Progress(ProgressUpdate {
                    processed: 0,
                    elapsed: Duration::ZERO,
                }),
            );
            let outcome = BuildOutcome::empty();
            emit(sender, OptimizerMessage::Finished(outcome.clone()));
            return Ok(outcome);
        };

        let signatures = SetSignatures::new(&request.set_filters)?;
        let mut keys = objective.keys();
        keys.extend(request.min_filters.keys().cloned());
        keys.extend(request.max_filters.keys().cloned());
        let dependencies = stats.modifiers.dependencies(&keys);
        let evaluator = stats.modifiers.compile(&dependencies)?;

        let unpruned = SetPartition::new(&request.pools, signatures.clone());
        let total = unpruned.total_build_count();

        info!(
            event = "optimize_start",
            slot_count = request.pools.slot_count(),
            candidate_count = request.pools.candidate_count(),
            total_combinations = total,
            dependency_count = dependencies.len(),
            derived_count = evaluator.step_count(),
            direction = %direction,
            max_results = request.max_results,
        );

        let (partition, prune_tier) =
            self.select_partition(request, &dependencies, &signatures, unpruned, total);
        let searched = partition.total_build_count();
        let mut run_stats = OptimizerStats {
            total_combinations: total,
            searched_combinations: searched,
            prune_tier,
            ..OptimizerStats::default()
        };
        scope.record_skipped(total.saturating_sub(searched));

        let termination = OrTermination((
            self.config.time_limit().map(TimeTermination::new),
            cancel.cloned().map(ExternalTermination::new),
        ));
        let interval = self.config.progress_interval.max(1);
        let mut top = TopKSelector::new(request.max_results, self.config.compaction_threshold);
        let mut scratch = AttributeBag::new();
        let mut terminated_early = false;

        let mut enumerator = BuildEnumerator::new(&partition, &stats.base);
        while enumerator.advance() {
            if scope.processed() % interval == 0 {
                emit(
                    sender,
                    OptimizerMessage::Progress(ProgressUpdate {
                        processed: scope.processed(),
                        elapsed: scope.elapsed(),
                    }),
                );
                if termination.is_terminated(&scope) {
                    terminated_early = true;
                    info!(event = "terminated_early", processed = scope.processed());
                    break;
                }
            }
            scope.record_processed();

            let combination = enumerator.current();
            scratch.reset_from(combination.raw_stats());
            if !request.set_effects.is_empty() {
                let mut set_counts: SmallVec<[(&str, usize); 8]> = SmallVec::new();
                for piece in combination.pieces() {
                    for set in piece.sets() {
                        match set_counts.iter_mut().find(|(s, _)| *s == set.as_str()) {
                            Some((_, count)) => *count += 1,
                            None => set_counts.push((set.as_str(), 1)),
                        }
                    }
                }
                request.set_effects.apply(set_counts, &mut scratch);
            }
            evaluator.evaluate(&mut scratch);

            let rejected = request
                .min_filters
                .iter()
                .any(|(key, &bound)| scratch.get(key) < bound)
                || request
                    .max_filters
                    .iter()
                    .any(|(key, &bound)| scratch.get(key) > bound);
            run_stats.record_evaluation(rejected);
            if rejected {
                continue;
            }

            let score = direction.signed(objective.value(&scratch));
            top.offer(score, || combination.to_pieces());
        }

        let selected = top.finish();
        run_stats.threshold_rejected = top.rejected();
        run_stats.compactions = top.compactions();
        trace!(
            event = "enumeration_done",
            configurations = enumerator.configurations(),
        );

        let elapsed = scope.elapsed();
        emit(
            sender,
            OptimizerMessage::Progress(ProgressUpdate {
                processed: scope.processed(),
                elapsed,
            }),
        );

        let builds: Vec<Build> = selected
            .into_iter()
            .map(|scored| Build {
                pieces: scored.item,
                value: direction.signed(scored.score),
            })
            .collect();

        info!(
            event = "optimize_end",
            processed = scope.processed(),
            evaluated = run_stats.evaluated,
            filtered = run_stats.filtered,
            build_count = builds.len(),
            best_value = builds.first().map(|b| b.value),
            duration_ms = elapsed.as_millis() as u64,
            terminated_early,
        );

        let outcome = BuildOutcome {
            builds,
            elapsed,
            terminated_early,
            stats: run_stats,
        };
        emit(sender, OptimizerMessage::Finished(outcome.clone()));
        Ok(outcome)
    }

    /// Picks the pool to search, trying pruning tiers in order.
    ///
    /// A tier is accepted when its pruned pool still holds at least
    /// `max_results` combinations. Pruning is skipped when disabled, or
    /// when a stat bound opposes the direction: pruning keeps the extreme
    /// candidates such a bound rejects.
    fn select_partition(
        &self,
        request: &OptimizeRequest,
        dependencies: &BTreeSet<AttrKey>,
        signatures: &SetSignatures,
        unpruned: SetPartition,
        total: u64,
    ) -> (SetPartition, PruneTier) {
        let direction = request.direction();
        let opposing_bounds = match direction {
            SortDirection::Descending => !request.max_filters.is_empty(),
            SortDirection::Ascending => !request.min_filters.is_empty(),
        };
        if !self.config.pruning.enabled || opposing_bounds {
            debug!(
                event = "prune_skipped",
                enabled = self.config.pruning.enabled,
                opposing_bounds,
            );
            return (unpruned, PruneTier::Unpruned);
        }

        let filtered_sets: BTreeSet<SetKey> = signatures.sets().iter().cloned().collect();
        let mut relevant_sets = request.set_effects.sets_touching(dependencies);
        relevant_sets.extend(filtered_sets.iter().cloned());
        let criteria = PruneCriteria::new(dependencies.clone(), direction)
            .with_relevant_sets(relevant_sets);

        let wanted = request.max_results as u64;
        let tiers = [
            (PruneTier::Aggressive, BTreeSet::new()),
            (PruneTier::KeepFilteredSets, filtered_sets),
        ];
        for (tier, always_keep) in tiers {
            let pool = prune_pool(&request.pools, &criteria.clone().with_always_keep(always_keep));
            let partition = SetPartition::new(&pool, signatures.clone());
            let combinations = partition.total_build_count();
            debug!(
                event = "prune",
                tier = %tier,
                candidate_count = pool.candidate_count(),
                combinations,
                unpruned_combinations = total,
            );
            if combinations >= wanted {
                return (partition, tier);
            }
        }

        debug!(event = "prune_fallback", unpruned_combinations = total);
        (unpruned, PruneTier::Unpruned)
    }
}

fn emit(sender: &mpsc::UnboundedSender<OptimizerMessage>, message: OptimizerMessage) {
    if sender.send(message).is_err() {
        trace!(event = "receiver_dropped");
    }
}

#[cfg(test)]
#[path = "optimizer_tests.rs"]
mod tests;
