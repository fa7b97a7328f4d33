//! Stat model: dependency resolution and derived attribute evaluation.
//!
//! The optimizer only needs two things from a stat model:
//! - [`DependencyResolver`]: which attribute keys influence a set of keys
//! - [`StatEvaluator`]: how to turn a bag of raw contributions into
//!   derived attributes, in place
//!
//! [`ModifierGraph`] is a linear model implementing both. Every derived
//! attribute gains `coefficient * source` for each of its modifiers, so
//! it is monotonic in its sources whenever coefficients are non-negative.

mod modifier;


use std::collections::BTreeSet;

use crate::attribute::{AttrKey, AttributeBag};

pub use modifier::{CompiledStats, Modifier, ModifierGraph};

/// Resolves the transitive set of attribute keys that influence `keys`.
pub trait DependencyResolver {
    /// Returns `keys` plus every key they read, directly or transitively.
    fn dependencies(&self, keys: &[AttrKey]) -> BTreeSet<AttrKey>;
}

/// Computes derived attributes in place.
pub trait StatEvaluator: Send + Sync {
    fn evaluate(&self, bag: &mut AttributeBag);
}

/// Starting attribute state of a run.
///
/// `character_key` selects character-specific formulas, `base` seeds every
/// combination's bag, and `modifiers` derives attributes from raw ones.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialStats {
    pub character_key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: AttributeBag,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: ModifierGraph,
}

impl InitialStats {
    pub fn new(character_key: impl Into<String>) -> Self {
        Self {
            character_key: character_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: AttributeBag) -> Self {
        self.base = base;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierGraph) -> Self {
        self.modifiers = modifiers;
        self
    }
}
