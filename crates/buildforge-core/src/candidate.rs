//! Candidates and slot pools.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::attribute::{AttributeBag, SetKey, SlotKey};

/// One equippable item instance.
///
/// A candidate fills exactly one slot, may belong to any number of sets,
/// and contributes a fixed bag of attributes to every build that uses it.
///
/// # Examples
///
/// ```
/// use buildforge_core::Candidate;
///
/// let flower = Candidate::new("flower-1", "flower")
///     .with_set("gladiator")
///     .with_stat("hp", 4780.0)
///     .with_stat("crit_rate", 3.9);
///
/// assert_eq!(flower.slot(), "flower");
/// assert!(flower.belongs_to("gladiator"));
/// assert_eq!(flower.contribution("crit_rate"), 3.9);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    id: String,
    slot: SlotKey,
    #[cfg_attr(feature = "serde", serde(default))]
    sets: Vec<SetKey>,
    #[cfg_attr(feature = "serde", serde(default))]
    stats: AttributeBag,
}

impl Candidate {
    /// Creates a candidate with no set membership and no stats.
    pub fn new(id: impl Into<String>, slot: impl Into<SlotKey>) -> Self {
        Self {
            id: id.into(),
            slot: slot.into(),
            sets: Vec::new(),
            stats: AttributeBag::new(),
        }
    }

    /// Adds a set membership.
    pub fn with_set(mut self, set: impl Into<SetKey>) -> Self {
        let set = set.into();
        if !self.sets.contains(&set) {
            self.sets.push(set);
        }
        self
    }

    /// Adds a stat contribution.
    pub fn with_stat(mut self, key: &str, value: f64) -> Self {
        self.stats.add(key, value);
        self
    }

    /// Replaces all stat contributions.
    pub fn with_stats(mut self, stats: AttributeBag) -> Self {
        self.stats = stats;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn sets(&self) -> &[SetKey] {
        &self.sets
    }

    pub fn stats(&self) -> &AttributeBag {
        &self.stats
    }

    /// Returns true if the candidate counts toward `set`.
    pub fn belongs_to(&self, set: &str) -> bool {
        self.sets.iter().any(|s| s == set)
    }

    /// Returns the raw contribution to `key` (`0.0` when absent).
    #[inline]
    pub fn contribution(&self, key: &str) -> f64 {
        self.stats.get(key)
    }
}

/// Candidates available for each slot of one optimization run.
///
/// Slots iterate in key order, which fixes the slot order of every
/// enumerated combination.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SlotPool {
    slots: BTreeMap<SlotKey, Vec<Arc<Candidate>>>,
}

impl SlotPool {
    /// Creates a pool with no slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Partitions candidates into slots, preserving their relative order.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let mut pool = SlotPool::new();
        for candidate in candidates {
            pool.push(candidate);
        }
        pool
    }

    /// Appends a candidate to its slot, creating the slot if needed.
    pub fn push(&mut self, candidate: Candidate) {
        self.slots
            .entry(candidate.slot.clone())
            .or_default()
            .push(Arc::new(candidate));
    }

    /// Declares a slot, possibly with no candidates.
    ///
    /// A slot with no candidates makes every combination impossible.
    pub fn add_slot(&mut self, slot: impl Into<SlotKey>) {
        self.slots.entry(slot.into()).or_default();
    }

    /// Replaces the candidate list of a slot.
    pub fn set_slot(&mut self, slot: impl Into<SlotKey>, candidates: Vec<Arc<Candidate>>) {
        self.slots.insert(slot.into(), candidates);
    }

    pub fn get(&self, slot: &str) -> Option<&[Arc<Candidate>]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    /// Iterates slots in key order.
    pub fn slots(&self) -> impl ExactSizeIterator<Item = (&str, &[Arc<Candidate>])> + '_ {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Total number of candidates across all slots.
    pub fn candidate_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Builds a new pool by transforming each slot's candidate list.
    pub fn map_slots<F>(&self, mut f: F) -> SlotPool
    where
        F: FnMut(&str, &[Arc<Candidate>]) -> Vec<Arc<Candidate>>,
    {
        SlotPool {
            slots: self
                .slots
                .iter()
                .map(|(slot, candidates)| (slot.clone(), f(slot, candidates)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_candidates_groups_by_slot() {
        let pool = SlotPool::from_candidates([
            Candidate::new("a", "plume"),
            Candidate::new("b", "flower"),
            Candidate::new("c", "plume"),
        ]);

        assert_eq!(pool.slot_count(), 2);
        assert_eq!(pool.candidate_count(), 3);

        let plumes: Vec<&str> = pool.get("plume").unwrap().iter().map(|c| c.id()).collect();
        assert_eq!(plumes, vec!["a", "c"]);
    }

    #[test]
    fn slots_iterate_in_key_order() {
        let pool = SlotPool::from_candidates([
            Candidate::new("x", "sands"),
            Candidate::new("y", "circlet"),
            Candidate::new("z", "flower"),
        ]);

        let order: Vec<&str> = pool.slots().map(|(slot, _)| slot).collect();
        assert_eq!(order, vec!["circlet", "flower", "sands"]);
    }

    #[test]
    fn with_set_ignores_duplicates() {
        let c = Candidate::new("a", "flower").with_set("x").with_set("x");
        assert_eq!(c.sets().len(), 1);
    }

    #[test]
    fn map_slots_keeps_empty_slots() {
        let mut pool = SlotPool::from_candidates([Candidate::new("a", "flower")]);
        pool.add_slot("goblet");

        let mapped = pool.map_slots(|_, candidates| candidates.to_vec());
        assert_eq!(mapped.slot_count(), 2);
        assert_eq!(mapped.get("goblet").map(<[_]>::len), Some(0));
    }
}
