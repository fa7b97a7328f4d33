//! Set bonuses granted for equipping several pieces of one set.

use std::collections::{BTreeMap, BTreeSet};

use crate::attribute::{AttrKey, AttributeBag, SetKey};

/// Stats granted once at least `pieces` pieces of a set are equipped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetBonus {
    pub pieces: usize,
    pub stats: AttributeBag,
}

/// Set bonuses for every set that has any.
///
/// # Examples
///
/// ```
/// use buildforge_core::{AttributeBag, SetEffects};
///
/// let mut effects = SetEffects::new();
/// effects.add_bonus("gladiator", 2, [("atk_", 18.0)].into_iter().collect());
///
/// let mut bag = AttributeBag::new();
/// effects.apply([("gladiator", 3)], &mut bag);
/// assert_eq!(bag.get("atk_"), 18.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SetEffects {
    sets: BTreeMap<SetKey, Vec<SetBonus>>,
}

impl SetEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bonus for `set` at `pieces` equipped pieces.
    pub fn add_bonus(&mut self, set: impl Into<SetKey>, pieces: usize, stats: AttributeBag) {
        self.sets
            .entry(set.into())
            .or_default()
            .push(SetBonus { pieces, stats });
    }

    pub fn bonuses(&self, set: &str) -> &[SetBonus] {
        self.sets.get(set).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns true if any bonus of `set` contributes to one of `keys`.
    pub fn touches(&self, set: &str, keys: &BTreeSet<AttrKey>) -> bool {
        self.bonuses(set)
            .iter()
            .any(|bonus| bonus.stats.keys().any(|k| keys.contains(k)))
    }

    /// Sets having at least one bonus that contributes to `keys`.
    pub fn sets_touching(&self, keys: &BTreeSet<AttrKey>) -> BTreeSet<SetKey> {
        self.sets
            .keys()
            .filter(|set| self.touches(set, keys))
            .cloned()
            .collect()
    }

    /// Adds every reached bonus for the given `(set, equipped pieces)` counts.
    pub fn apply<'a, I>(&self, counts: I, bag: &mut AttributeBag)
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        if self.sets.is_empty() {
            return;
        }
        for (set, pieces) in counts {
            for bonus in self.bonuses(set) {
                if pieces >= bonus.pieces {
                    bag.add_all(&bonus.stats);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effects() -> SetEffects {
        let mut effects = SetEffects::new();
        effects.add_bonus("gladiator", 2, [("atk_", 18.0)].into_iter().collect());
        effects.add_bonus("gladiator", 4, [("normal_dmg_", 35.0)].into_iter().collect());
        effects.add_bonus("maiden", 2, [("heal_", 15.0)].into_iter().collect());
        effects
    }

    #[test]
    fn apply_adds_only_reached_thresholds() {
        let mut bag = AttributeBag::new();
        effects().apply([("gladiator", 2), ("maiden", 1)], &mut bag);

        assert_eq!(bag.get("atk_"), 18.0);
        assert_eq!(bag.get("normal_dmg_"), 0.0);
        assert_eq!(bag.get("heal_"), 0.0);
    }

    #[test]
    fn apply_stacks_bonuses_of_one_set() {
        let mut bag = AttributeBag::new();
        effects().apply([("gladiator", 5)], &mut bag);

        assert_eq!(bag.get("atk_"), 18.0);
        assert_eq!(bag.get("normal_dmg_"), 35.0);
    }

    #[test]
    fn sets_touching_filters_by_key() {
        let keys: BTreeSet<AttrKey> = ["atk_".to_string()].into_iter().collect();
        let touching = effects().sets_touching(&keys);

        assert_eq!(touching.len(), 1);
        assert!(touching.contains("gladiator"));
    }

    #[test]
    fn unknown_set_has_no_bonuses() {
        assert!(effects().bonuses("wanderer").is_empty());
    }
}
