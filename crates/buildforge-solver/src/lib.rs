//! BuildForge Search Engine
//!
//! This crate provides the exhaustive build search including:
//! - Candidate pruning by dominance
//! - Set-aware lazy enumeration of combinations
//! - Bounded top-k result selection
//! - Objective resolution through a formula registry
//! - Termination conditions and cancellation
//! - The evaluation loop and its background task manager

pub mod enumerate;
pub mod manager;
pub mod message;
pub mod objective;
pub mod optimizer;
pub mod prune;
pub mod scope;
pub mod stats;
pub mod termination;
pub mod top_k;

pub use enumerate::{
    total_build_count, BuildEnumerator, CandidateGroup, Combination, CombinationWalker,
    SetConfiguration, SetPartition, SetPermutations, SetSignatures,
};
pub use manager::{OptimizerHandle, OptimizerManager};
pub use message::{Build, BuildOutcome, OptimizeRequest, OptimizerMessage, ProgressUpdate};
pub use objective::{Formula, FormulaRegistry, ResolvedObjective};
pub use optimizer::BuildOptimizer;
pub use prune::{prune_candidates, prune_pool, PruneCriteria};
pub use scope::SearchScope;
pub use stats::{OptimizerStats, PruneTier};
pub use termination::{
    CancellationToken, ExternalTermination, OrTermination, Termination, TimeTermination,
};
pub use top_k::{Scored, TopKSelector};
