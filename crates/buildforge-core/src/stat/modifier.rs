//! Linear modifier graph.

use std::collections::{BTreeMap, BTreeSet};

use crate::attribute::{AttrKey, AttributeBag};
use crate::error::{BuildForgeError, Result};

use super::{DependencyResolver, StatEvaluator};

/// One linear term of a derived attribute: `coefficient * source`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub source: AttrKey,
    pub coefficient: f64,
}

/// Derived attributes as linear combinations of other attributes.
///
/// # Examples
///
/// ```
/// use buildforge_core::{AttributeBag, DependencyResolver, ModifierGraph, StatEvaluator};
///
/// // atk = atk + base_atk * atk_ / 100
/// let mut graph = ModifierGraph::new();
/// graph.add("atk", "base_atk_pct", 1.0);
///
/// let deps = graph.dependencies(&["atk".to_string()]);
/// assert!(deps.contains("base_atk_pct"));
///
/// let compiled = graph.compile(&deps).unwrap();
/// let mut bag: AttributeBag = [("atk", 100.0), ("base_atk_pct", 50.0)].into_iter().collect();
/// compiled.evaluate(&mut bag);
/// assert_eq!(bag.get("atk"), 150.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModifierGraph {
    terms: BTreeMap<AttrKey, Vec<Modifier>>,
}

impl ModifierGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `coefficient * source` to `target`.
    pub fn add(&mut self, target: impl Into<AttrKey>, source: impl Into<AttrKey>, coefficient: f64) {
        self.terms.entry(target.into()).or_default().push(Modifier {
            source: source.into(),
            coefficient,
        });
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, target: impl Into<AttrKey>, source: impl Into<AttrKey>, coefficient: f64) -> Self {
        self.add(target, source, coefficient);
        self
    }

    /// Modifiers feeding `target`.
    pub fn modifiers(&self, target: &str) -> &[Modifier] {
        self.terms.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compiles an evaluator restricted to `dependencies`.
    ///
    /// Only targets inside `dependencies` are evaluated. Targets are
    /// ordered so every source is final before it is read.
    ///
    /// # Errors
    ///
    /// Returns [`BuildForgeError::CyclicModifier`] if a reachable target
    /// depends on itself.
    pub fn compile(&self, dependencies: &BTreeSet<AttrKey>) -> Result<CompiledStats> {
        let mut order = Vec::new();
        let mut state: BTreeMap<&str, Visit> = BTreeMap::new();

        for target in dependencies {
            self.visit(target, dependencies, &mut state, &mut order)?;
        }

        let steps = order
            .into_iter()
            .map(|target| (target.to_owned(), self.modifiers(target).to_vec()))
            .collect();
        Ok(CompiledStats { steps })
    }

    fn visit<'a>(
        &'a self,
        target: &'a str,
        dependencies: &BTreeSet<AttrKey>,
        state: &mut BTreeMap<&'a str, Visit>,
        order: &mut Vec<&'a str>,
    ) -> Result<()> {
        match state.get(target) {
            Some(Visit::Done) => return Ok(()),
            Some(Visit::InProgress) => {
                return Err(BuildForgeError::CyclicModifier(target.to_owned()))
            }
            None => {}
        }
        let Some(modifiers) = self.terms.get(target) else {
            state.insert(target, Visit::Done);
            return Ok(());
        };

        state.insert(target, Visit::InProgress);
        for modifier in modifiers {
            self.visit(&modifier.source, dependencies, state, order)?;
        }
        state.insert(target, Visit::Done);

        if dependencies.contains(target) {
            order.push(target);
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Visit {
    InProgress,
    Done,
}

impl DependencyResolver for ModifierGraph {
    fn dependencies(&self, keys: &[AttrKey]) -> BTreeSet<AttrKey> {
        let mut closure: BTreeSet<AttrKey> = BTreeSet::new();
        let mut stack: Vec<&str> = keys.iter().map(String::as_str).collect();

        while let Some(key) = stack.pop() {
            if !closure.insert(key.to_owned()) {
                continue;
            }
            for modifier in self.modifiers(key) {
                if !closure.contains(&modifier.source) {
                    stack.push(&modifier.source);
                }
            }
        }
        closure
    }
}

/// A modifier graph flattened into evaluation order for one run.
#[derive(Debug, Clone, Default)]
pub struct CompiledStats {
    steps: Vec<(AttrKey, Vec<Modifier>)>,
}

impl CompiledStats {
    /// Number of derived attributes evaluated per combination.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

impl StatEvaluator for CompiledStats {
    fn evaluate(&self, bag: &mut AttributeBag) {
        for (target, modifiers) in &self.steps {
            let delta: f64 = modifiers
                .iter()
                .map(|m| m.coefficient * bag.get(&m.source))
                .sum();
            bag.add(target, delta);
        }
    }
}
