//! Objective resolution through a formula registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use buildforge_core::{AttrKey, AttributeBag, FormulaKey, InitialStats, Objective};

type FormulaFn = dyn Fn(&AttributeBag) -> f64 + Send + Sync;
type FormulaFactory = dyn Fn(&InitialStats) -> Formula + Send + Sync;

/// A compiled formula: an evaluator plus the attribute keys it reads.
#[derive(Clone)]
pub struct Formula {
    evaluate: Arc<FormulaFn>,
    dependencies: Vec<AttrKey>,
}

impl Formula {
    pub fn new<F>(dependencies: Vec<AttrKey>, evaluate: F) -> Self
    where
        F: Fn(&AttributeBag) -> f64 + Send + Sync + 'static,
    {
        Self {
            evaluate: Arc::new(evaluate),
            dependencies,
        }
    }

    #[inline]
    pub fn evaluate(&self, bag: &AttributeBag) -> f64 {
        (self.evaluate)(bag)
    }

    /// Attribute keys the formula reads.
    pub fn dependencies(&self) -> &[AttrKey] {
        &self.dependencies
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formula")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Formula factories keyed by `(character, talent, formula)`.
///
/// A factory receives the run's initial stats, so it can capture
/// character-specific constants when the formula is built.
///
/// # Examples
///
/// ```
/// use buildforge_core::{FormulaKey, InitialStats};
/// use buildforge_solver::{Formula, FormulaRegistry};
///
/// let mut registry = FormulaRegistry::new();
/// registry.register(FormulaKey::new("hutao", "charged", "dmg"), |_stats| {
///     Formula::new(vec!["atk".into(), "dmg_".into()], |bag| {
///         bag.get("atk") * (1.0 + bag.get("dmg_") / 100.0)
///     })
/// });
///
/// let formula = registry
///     .resolve(&FormulaKey::new("hutao", "charged", "dmg"), &InitialStats::new("hutao"))
///     .unwrap();
/// assert_eq!(formula.dependencies().len(), 2);
/// ```
#[derive(Default, Clone)]
pub struct FormulaRegistry {
    factories: HashMap<FormulaKey, Arc<FormulaFactory>>,
}

impl FormulaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory, replacing any previous one for `key`.
    pub fn register<F>(&mut self, key: FormulaKey, factory: F)
    where
        F: Fn(&InitialStats) -> Formula + Send + Sync + 'static,
    {
        self.factories.insert(key, Arc::new(factory));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<F>(mut self, key: FormulaKey, factory: F) -> Self
    where
        F: Fn(&InitialStats) -> Formula + Send + Sync + 'static,
    {
        self.register(key, factory);
        self
    }

    /// Builds the formula registered under `key`, if any.
    pub fn resolve(&self, key: &FormulaKey, stats: &InitialStats) -> Option<Formula> {
        self.factories.get(key).map(|factory| factory(stats))
    }

    pub fn contains(&self, key: &FormulaKey) -> bool {
        self.factories.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FormulaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.factories.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("FormulaRegistry")
            .field("formulas", &keys)
            .finish()
    }
}

/// An objective ready to score evaluated bags.
#[derive(Debug, Clone)]
pub enum ResolvedObjective {
    /// Read one attribute directly.
    Attribute(AttrKey),
    Formula(Formula),
}

impl ResolvedObjective {
    /// Resolves `objective` for a run. Returns `None` when a formula
    /// objective has no registered factory.
    ///
    /// A formula reading exactly one key is replaced by a direct read of
    /// that key. Such formulas must be monotonically increasing in their
    /// key, or ranking by the raw attribute would differ from ranking by
    /// the formula.
    pub fn resolve(
        objective: &Objective,
        stats: &InitialStats,
        registry: &FormulaRegistry,
    ) -> Option<Self> {
        match objective {
            Objective::Attribute(key) => Some(ResolvedObjective::Attribute(key.clone())),
            Objective::Formula { talent, formula } => {
                let key = FormulaKey::new(stats.character_key.clone(), talent, formula);
                let formula = registry.resolve(&key, stats)?;
                match formula.dependencies() {
                    [single] => Some(ResolvedObjective::Attribute(single.clone())),
                    _ => Some(ResolvedObjective::Formula(formula)),
                }
            }
        }
    }

    /// Objective value of an evaluated bag.
    #[inline]
    pub fn value(&self, bag: &AttributeBag) -> f64 {
        match self {
            ResolvedObjective::Attribute(key) => bag.get(key),
            ResolvedObjective::Formula(formula) => formula.evaluate(bag),
        }
    }

    /// Attribute keys the objective reads.
    pub fn keys(&self) -> Vec<AttrKey> {
        match self {
            ResolvedObjective::Attribute(key) => vec![key.clone()],
            ResolvedObjective::Formula(formula) => formula.dependencies().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> FormulaRegistry {
        FormulaRegistry::new()
            .with(FormulaKey::new("hutao", "charged", "dmg"), |stats| {
                let bonus = stats.base.get("talent_mult");
                Formula::new(vec!["atk".into(), "hp".into()], move |bag| {
                    bonus * (bag.get("atk") + 0.1 * bag.get("hp"))
                })
            })
            .with(FormulaKey::new("hutao", "normal", "hp"), |_| {
                Formula::new(vec!["hp".into()], |bag| 2.0 * bag.get("hp"))
            })
    }

    fn hutao() -> InitialStats {
        InitialStats::new("hutao").with_base([("talent_mult", 2.0)].into_iter().collect())
    }

    #[test]
    fn attribute_objective_resolves_directly() {
        let resolved =
            ResolvedObjective::resolve(&Objective::attribute("atk"), &hutao(), &registry())
                .unwrap();
        let bag: AttributeBag = [("atk", 7.0)].into_iter().collect();

        assert_eq!(resolved.value(&bag), 7.0);
        assert_eq!(resolved.keys(), vec!["atk".to_string()]);
    }

    #[test]
    fn formula_uses_character_from_initial_stats() {
        let objective = Objective::formula("charged", "dmg");
        let resolved = ResolvedObjective::resolve(&objective, &hutao(), &registry()).unwrap();
        let bag: AttributeBag = [("atk", 10.0), ("hp", 100.0)].into_iter().collect();

        assert!(matches!(resolved, ResolvedObjective::Formula(_)));
        assert_eq!(resolved.value(&bag), 40.0);

        let other = InitialStats::new("xiao");
        assert!(ResolvedObjective::resolve(&objective, &other, &registry()).is_none());
    }

    #[test]
    fn single_key_formula_becomes_attribute() {
        let objective = Objective::formula("normal", "hp");
        let resolved = ResolvedObjective::resolve(&objective, &hutao(), &registry()).unwrap();

        match resolved {
            ResolvedObjective::Attribute(key) => assert_eq!(key, "hp"),
            other => panic!("expected attribute shortcut, got {other:?}"),
        }
    }

    #[test]
    fn unknown_formula_is_unresolved() {
        let objective = Objective::formula("burst", "dmg");
        assert!(ResolvedObjective::resolve(&objective, &hutao(), &registry()).is_none());
    }

    #[test]
    fn registry_bookkeeping() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(&FormulaKey::new("hutao", "normal", "hp")));
        assert!(!FormulaRegistry::new().contains(&FormulaKey::new("a", "b", "c")));
    }
}
