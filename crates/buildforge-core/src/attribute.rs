//! Attribute bags - sparse numeric stat maps.

use std::collections::hash_map;
use std::collections::HashMap;

/// Key of a numeric attribute (e.g. `"atk"`, `"crit_rate"`).
pub type AttrKey = String;

/// Key of an equipment set.
pub type SetKey = String;

/// Key of an equipment slot.
pub type SlotKey = String;

/// A sparse mapping from attribute key to numeric value.
///
/// Missing keys read as `0.0`, so bags can be summed without first
/// agreeing on a key set.
///
/// # Examples
///
/// ```
/// use buildforge_core::AttributeBag;
///
/// let mut bag: AttributeBag = [("atk", 10.0), ("hp", 100.0)].into_iter().collect();
/// bag.add("atk", 5.0);
///
/// assert_eq!(bag.get("atk"), 15.0);
/// assert_eq!(bag.get("def"), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AttributeBag {
    values: HashMap<AttrKey, f64>,
}

impl AttributeBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, or `0.0` when absent.
    #[inline]
    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    /// Returns the value for `key` only if it was ever set.
    pub fn try_get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Overwrites the value for `key`.
    pub fn set(&mut self, key: impl Into<AttrKey>, value: f64) {
        self.values.insert(key.into(), value);
    }

    /// Adds `value` to the current value of `key`.
    #[inline]
    pub fn add(&mut self, key: &str, value: f64) {
        match self.values.get_mut(key) {
            Some(current) => *current += value,
            None => {
                self.values.insert(key.to_owned(), value);
            }
        }
    }

    /// Adds every entry of `other` into this bag.
    pub fn add_all(&mut self, other: &AttributeBag) {
        for (key, value) in &other.values {
            self.add(key, *value);
        }
    }

    /// Replaces the contents with a copy of `other`, reusing the allocation.
    #[inline]
    pub fn reset_from(&mut self, other: &AttributeBag) {
        self.values.clone_from(&other.values);
    }

    /// Returns true if `key` was ever set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<AttrKey>> FromIterator<(K, f64)> for AttributeBag {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut bag = AttributeBag::new();
        for (key, value) in iter {
            let key = key.into();
            bag.add(&key, value);
        }
        bag
    }
}

impl<'a> IntoIterator for &'a AttributeBag {
    type Item = (&'a AttrKey, &'a f64);
    type IntoIter = hash_map::Iter<'a, AttrKey, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_zero() {
        let bag = AttributeBag::new();
        assert_eq!(bag.get("atk"), 0.0);
        assert_eq!(bag.try_get("atk"), None);
    }

    #[test]
    fn add_all_sums_per_key() {
        let mut left: AttributeBag = [("atk", 10.0), ("hp", 5.0)].into_iter().collect();
        let right: AttributeBag = [("atk", 2.5), ("def", 1.0)].into_iter().collect();

        left.add_all(&right);

        assert_eq!(left.get("atk"), 12.5);
        assert_eq!(left.get("hp"), 5.0);
        assert_eq!(left.get("def"), 1.0);
        assert_eq!(left.len(), 3);
    }

    #[test]
    fn from_iter_merges_duplicate_keys() {
        let bag: AttributeBag = [("atk", 1.0), ("atk", 2.0)].into_iter().collect();
        assert_eq!(bag.get("atk"), 3.0);
    }

    #[test]
    fn reset_from_discards_previous_values() {
        let mut scratch: AttributeBag = [("stale", 99.0)].into_iter().collect();
        let source: AttributeBag = [("atk", 1.0)].into_iter().collect();

        scratch.reset_from(&source);

        assert_eq!(scratch, source);
        assert!(!scratch.contains_key("stale"));
    }
}
