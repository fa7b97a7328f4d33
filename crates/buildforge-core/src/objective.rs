//! Optimization objectives and sort direction.

use std::fmt;

use crate::attribute::AttrKey;

/// What a run optimizes.
///
/// An objective is either a single derived attribute, read directly from
/// the evaluated bag, or a named formula looked up in a formula registry
/// under the character identity of the initial stats.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Objective {
    /// Optimize the value of one attribute.
    Attribute(AttrKey),

    /// Optimize a registered formula of the current character.
    Formula { talent: String, formula: String },
}

impl Objective {
    pub fn attribute(key: impl Into<AttrKey>) -> Self {
        Objective::Attribute(key.into())
    }

    pub fn formula(talent: impl Into<String>, formula: impl Into<String>) -> Self {
        Objective::Formula {
            talent: talent.into(),
            formula: formula.into(),
        }
    }
}

/// Identity triple of a registered formula.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaKey {
    pub character: String,
    pub talent: String,
    pub formula: String,
}

impl FormulaKey {
    pub fn new(
        character: impl Into<String>,
        talent: impl Into<String>,
        formula: impl Into<String>,
    ) -> Self {
        Self {
            character: character.into(),
            talent: talent.into(),
            formula: formula.into(),
        }
    }
}

impl fmt::Display for FormulaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.character, self.talent, self.formula)
    }
}

/// Direction of optimization.
///
/// `Descending` keeps the highest objective values (maximize),
/// `Ascending` keeps the lowest (minimize).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    /// Maps an objective value onto a "higher is better" score.
    #[inline]
    pub fn signed(self, value: f64) -> f64 {
        match self {
            SortDirection::Ascending => -value,
            SortDirection::Descending => value,
        }
    }

    /// Returns true if `a` is at least as good as `b` in this direction.
    #[inline]
    pub fn at_least_as_good(self, a: f64, b: f64) -> bool {
        match self {
            SortDirection::Ascending => a <= b,
            SortDirection::Descending => a >= b,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "Ascending"),
            SortDirection::Descending => write!(f, "Descending"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_negates_only_when_ascending() {
        assert_eq!(SortDirection::Descending.signed(3.0), 3.0);
        assert_eq!(SortDirection::Ascending.signed(3.0), -3.0);
    }

    #[test]
    fn at_least_as_good_follows_direction() {
        assert!(SortDirection::Descending.at_least_as_good(5.0, 5.0));
        assert!(SortDirection::Descending.at_least_as_good(6.0, 5.0));
        assert!(!SortDirection::Descending.at_least_as_good(4.0, 5.0));
        assert!(SortDirection::Ascending.at_least_as_good(4.0, 5.0));
        assert!(!SortDirection::Ascending.at_least_as_good(6.0, 5.0));
    }

    #[test]
    fn formula_key_display() {
        let key = FormulaKey::new("hutao", "charged", "dmg");
        assert_eq!(key.to_string(), "hutao/charged/dmg");
    }

    #[test]
    fn default_direction_maximizes() {
        assert_eq!(SortDirection::default(), SortDirection::Descending);
        assert_eq!(SortDirection::from_ascending(true), SortDirection::Ascending);
    }
}
