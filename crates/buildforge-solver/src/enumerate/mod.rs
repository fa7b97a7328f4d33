//! Lazy, set-aware enumeration of build combinations.
//!
//! Enumeration runs in two levels:
//!
//! - **Set level**: every candidate of a slot falls into one group keyed by
//!   its [signature](SetSignatures), the bitmask of filtered sets it belongs
//!   to. [`SetPermutations`] yields every choice of one group per slot whose
//!   signatures satisfy all set filters.
//! - **Candidate level**: [`CombinationWalker`] walks the cartesian product
//!   of the chosen groups, keeping a stack of partial attribute sums so a
//!   step only recomputes the slots that changed.
//!
//! Since groups partition each slot, every combination belongs to exactly
//! one set-level configuration and is produced exactly once.

mod permutations;
mod walker;


use std::collections::BTreeMap;
use std::sync::Arc;

use buildforge_core::{
    AttributeBag, BuildForgeError, Candidate, Result, SetFilter, SetKey, SlotKey, SlotPool,
};
use tracing::trace;

pub use permutations::{SetConfiguration, SetPermutations};
pub use walker::{Combination, CombinationWalker};

/// Maximum number of distinct filtered sets.
pub const MAX_FILTERED_SETS: usize = u64::BITS as usize;

/// Bit assignment for the sets referenced by set filters.
///
/// Filters on the same set are merged, keeping the largest required count.
/// Filters requiring zero pieces constrain nothing and are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetSignatures {
    sets: Vec<SetKey>,
    required: Vec<usize>,
}

impl SetSignatures {
    /// Assigns one bit per distinct filtered set.
    ///
    /// # Errors
    ///
    /// Returns [`BuildForgeError::TooManySetFilters`] when more than
    /// [`MAX_FILTERED_SETS`] distinct sets are filtered.
    pub fn new(filters: &[SetFilter]) -> Result<Self> {
        let mut signatures = SetSignatures::default();
        for filter in filters.iter().filter(|f| f.required_count > 0) {
            match signatures.sets.iter().position(|s| *s == filter.set_key) {
                Some(bit) => {
                    signatures.required[bit] = signatures.required[bit].max(filter.required_count)
                }
                None => {
                    signatures.sets.push(filter.set_key.clone());
                    signatures.required.push(filter.required_count);
                }
            }
        }
        if signatures.sets.len() > MAX_FILTERED_SETS {
            return Err(BuildForgeError::TooManySetFilters(signatures.sets.len()));
        }
        Ok(signatures)
    }

    /// Filtered sets in bit order.
    pub fn sets(&self) -> &[SetKey] {
        &self.sets
    }

    /// Required piece count of the set at `bit`.
    pub fn required(&self, bit: usize) -> usize {
        self.required[bit]
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Bitmask of the filtered sets `candidate` belongs to.
    pub fn signature(&self, candidate: &Candidate) -> u64 {
        self.sets
            .iter()
            .enumerate()
            .filter(|(_, set)| candidate.belongs_to(set))
            .fold(0, |mask, (bit, _)| mask | (1u64 << bit))
    }

    /// Returns true if one piece per signature satisfies every filter.
    pub fn is_satisfied_by<I>(&self, signatures: I) -> bool
    where
        I: IntoIterator<Item = u64> + Clone,
    {
        self.required.iter().enumerate().all(|(bit, &required)| {
            let pieces = signatures
                .clone()
                .into_iter()
                .filter(|signature| signature & (1u64 << bit) != 0)
                .count();
            pieces >= required
        })
    }
}

/// Candidates of one slot sharing a signature.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateGroup {
    signature: u64,
    candidates: Vec<Arc<Candidate>>,
}

impl CandidateGroup {
    pub fn signature(&self) -> u64 {
        self.signature
    }

    pub fn candidates(&self) -> &[Arc<Candidate>] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone)]
struct SlotGroups {
    slot: SlotKey,
    groups: Vec<CandidateGroup>,
}

/// A pool split into signature groups per slot.
///
/// Groups within a slot are ordered by signature, and candidates within a
/// group keep their pool order.
#[derive(Debug, Clone)]
pub struct SetPartition {
    slots: Vec<SlotGroups>,
    signatures: SetSignatures,
}

impl SetPartition {
    pub fn new(pool: &SlotPool, signatures: SetSignatures) -> Self {
        let slots = pool
            .slots()
            .map(|(slot, candidates)| {
                let mut by_signature: BTreeMap<u64, Vec<Arc<Candidate>>> = BTreeMap::new();
                for candidate in candidates {
                    by_signature
                        .entry(signatures.signature(candidate))
                        .or_default()
                        .push(Arc::clone(candidate));
                }
                SlotGroups {
                    slot: slot.to_owned(),
                    groups: by_signature
                        .into_iter()
                        .map(|(signature, candidates)| CandidateGroup {
                            signature,
                            candidates,
                        })
                        .collect(),
                }
            })
            .collect();
        Self { slots, signatures }
    }

    pub fn signatures(&self) -> &SetSignatures {
        &self.signatures
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot keys in enumeration order.
    pub fn slot_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.iter().map(|s| s.slot.as_str())
    }

    /// Signature groups of the slot at `index`.
    pub fn groups(&self, index: usize) -> &[CandidateGroup] {
        &self.slots[index].groups
    }

    /// Every set-level configuration satisfying the filters.
    pub fn permutations(&self) -> SetPermutations<'_> {
        SetPermutations::new(self)
    }

    /// Number of combinations the partition enumerates, saturating at
    /// `u64::MAX`.
    pub fn total_build_count(&self) -> u64 {
        self.permutations()
            .fold(0u64, |total, config| total.saturating_add(config.combination_count()))
    }
}

/// Number of combinations of `pool` satisfying `filters`.
///
/// # Examples
///
/// ```
/// use buildforge_core::{Candidate, SetFilter, SlotPool};
/// use buildforge_solver::total_build_count;
///
/// let pool = SlotPool::from_candidates([
///     Candidate::new("f1", "flower").with_set("gladiator"),
///     Candidate::new("f2", "flower"),
///     Candidate::new("p1", "plume").with_set("gladiator"),
///     Candidate::new("p2", "plume"),
/// ]);
///
/// assert_eq!(total_build_count(&pool, &[]).unwrap(), 4);
/// assert_eq!(total_build_count(&pool, &[SetFilter::new("gladiator", 2)]).unwrap(), 1);
/// ```
pub fn total_build_count(pool: &SlotPool, filters: &[SetFilter]) -> Result<u64> {
    let signatures = SetSignatures::new(filters)?;
    Ok(SetPartition::new(pool, signatures).total_build_count())
}

/// Streams every combination of a partition, configuration by
/// configuration.
///
/// The enumerator is not an [`Iterator`]: each combination borrows the
/// walker's internal buffers, so it is read through [`current`](Self::current)
/// between calls to [`advance`](Self::advance).
///
/// # Examples
///
/// ```
/// use buildforge_core::{AttributeBag, Candidate, SlotPool};
/// use buildforge_solver::{BuildEnumerator, SetPartition, SetSignatures};
///
/// let pool = SlotPool::from_candidates([
///     Candidate::new("f1", "flower").with_stat("atk", 10.0),
///     Candidate::new("p1", "plume").with_stat("atk", 5.0),
///     Candidate::new("p2", "plume").with_stat("atk", 15.0),
/// ]);
/// let partition = SetPartition::new(&pool, SetSignatures::new(&[]).unwrap());
/// let mut enumerator = BuildEnumerator::new(&partition, &AttributeBag::new());
///
/// let mut totals = Vec::new();
/// while enumerator.advance() {
///     totals.push(enumerator.current().raw_stats().get("atk"));
/// }
/// assert_eq!(totals, vec![15.0, 25.0]);
/// ```
pub struct BuildEnumerator<'a> {
    permutations: SetPermutations<'a>,
    walker: CombinationWalker<'a>,
    configurations: u64,
}

impl<'a> BuildEnumerator<'a> {
    /// Creates an enumerator seeding every combination with `base`.
    pub fn new(partition: &'a SetPartition, base: &AttributeBag) -> Self {
        Self {
            permutations: partition.permutations(),
            walker: CombinationWalker::idle(base),
            configurations: 0,
        }
    }

    /// Moves to the next combination. Returns false once exhausted.
    pub fn advance(&mut self) -> bool {
        loop {
            if self.walker.step() {
                return true;
            }
            let Some(config) = self.permutations.next() else {
                return false;
            };
            self.configurations += 1;
            trace!(
                event = "set_configuration",
                index = self.configurations,
                combinations = config.combination_count(),
            );
            self.walker.restart(config.slot_candidates());
        }
    }

    /// The combination reached by the last successful [`advance`](Self::advance).
    pub fn current(&self) -> Combination<'_> {
        self.walker.current()
    }

    /// Number of set-level configurations entered so far.
    pub fn configurations(&self) -> u64 {
        self.configurations
    }
}
