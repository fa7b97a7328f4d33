//! Build constraints: set piece requirements and stat bounds.

use std::collections::BTreeMap;

use crate::attribute::{AttrKey, SetKey};

/// Inclusive numeric bounds on derived attributes, keyed by attribute.
///
/// Used both for minimum filters (`value < bound` rejects) and maximum
/// filters (`value > bound` rejects).
pub type StatBounds = BTreeMap<AttrKey, f64>;

/// Requires at least `required_count` equipped pieces of `set_key`.
///
/// # Examples
///
/// ```
/// use buildforge_core::SetFilter;
///
/// let four_piece = SetFilter::new("gladiator", 4);
/// assert!(four_piece.is_satisfied_by(4));
/// assert!(!four_piece.is_satisfied_by(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetFilter {
    pub set_key: SetKey,
    pub required_count: usize,
}

impl SetFilter {
    pub fn new(set_key: impl Into<SetKey>, required_count: usize) -> Self {
        Self {
            set_key: set_key.into(),
            required_count,
        }
    }

    #[inline]
    pub fn is_satisfied_by(&self, pieces: usize) -> bool {
        pieces >= self.required_count
    }
}
