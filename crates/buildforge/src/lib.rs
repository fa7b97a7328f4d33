//! BuildForge - An exhaustive equipment build optimizer in Rust
//!
//! Describe the candidates of every slot, the set and stat constraints and
//! an objective, then search every combination for the best builds.
//!
//! # Example
//!
//! ```rust
//! use buildforge::prelude::*;
//!
//! let pool = SlotPool::from_candidates([
//!     Candidate::new("flower-1", "flower").with_stat("atk", 10.0),
//!     Candidate::new("flower-2", "flower").with_stat("atk", 20.0),
//!     Candidate::new("plume-1", "plume").with_stat("atk", 5.0),
//! ]);
//! let request = OptimizeRequest::new(pool, InitialStats::new("hutao"), Objective::attribute("atk"))
//!     .with_max_results(1);
//!
//! let outcome = BuildOptimizer::new(FormulaRegistry::new()).optimize(&request).unwrap();
//! assert_eq!(outcome.builds[0].value, 25.0);
//! ```

#[cfg(feature = "console")]
pub mod console;

// Data model
pub use buildforge_core::{
    AttrKey, AttributeBag, BuildForgeError, Candidate, FormulaKey, InitialStats, ModifierGraph,
    Objective, Result, SetEffects, SetFilter, SetKey, SlotKey, SlotPool, SortDirection,
    StatBounds,
};

// Stat model traits for custom evaluators
pub use buildforge_core::{DependencyResolver, StatEvaluator};

// Configuration
pub use buildforge_config::{ConfigError, OptimizerConfig};

// Search
pub use buildforge_solver::{
    total_build_count, Build, BuildOptimizer, BuildOutcome, CancellationToken, Formula,
    FormulaRegistry, OptimizeRequest, OptimizerHandle, OptimizerManager, OptimizerMessage,
    OptimizerStats, ProgressUpdate, PruneTier,
};

/// Lower-level building blocks: pruning, enumeration, top-k selection.
pub mod search {
    pub use buildforge_solver::enumerate;
    pub use buildforge_solver::prune;
    pub use buildforge_solver::termination;
    pub use buildforge_solver::top_k;
}

pub mod prelude {
    pub use super::{
        AttributeBag, Build, BuildOptimizer, BuildOutcome, Candidate, Formula, FormulaKey,
        FormulaRegistry, InitialStats, Objective, OptimizeRequest, OptimizerConfig,
        OptimizerManager, OptimizerMessage, SetEffects, SetFilter, SlotPool,
    };
}
