//! Set-level configurations.

use std::sync::Arc;

use buildforge_core::Candidate;

use super::{CandidateGroup, SetPartition};

/// One signature group per slot, jointly satisfying every set filter.
#[derive(Debug, Clone)]
pub struct SetConfiguration<'a> {
    groups: Vec<&'a CandidateGroup>,
}

impl<'a> SetConfiguration<'a> {
    /// Chosen group of each slot, in slot order.
    pub fn groups(&self) -> &[&'a CandidateGroup] {
        &self.groups
    }

    /// Candidate lists to walk, in slot order.
    pub fn slot_candidates(&self) -> Vec<&'a [Arc<Candidate>]> {
        self.groups.iter().map(|g| g.candidates()).collect()
    }

    /// Size of this configuration's cartesian product, saturating.
    pub fn combination_count(&self) -> u64 {
        self.groups
            .iter()
            .fold(1u64, |count, g| count.saturating_mul(g.len() as u64))
    }
}

/// Iterator over the valid set-level configurations of a partition.
///
/// Runs an odometer over per-slot group indices, the last slot turning
/// fastest, and skips tuples that miss a filter. A partition with no slots
/// has one empty tuple, valid only when no filter requires pieces.
#[derive(Debug, Clone)]
pub struct SetPermutations<'a> {
    partition: &'a SetPartition,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> SetPermutations<'a> {
    pub(super) fn new(partition: &'a SetPartition) -> Self {
        let exhausted = (0..partition.slot_count()).any(|slot| partition.groups(slot).is_empty());
        Self {
            partition,
            indices: vec![0; partition.slot_count()],
            exhausted,
        }
    }

    fn configuration(&self) -> Vec<&'a CandidateGroup> {
        let partition = self.partition;
        self.indices
            .iter()
            .enumerate()
            .map(|(slot, &index)| &partition.groups(slot)[index])
            .collect()
    }

    /// Turns the odometer. Returns false when it wraps around.
    fn turn(&mut self) -> bool {
        for slot in (0..self.indices.len()).rev() {
            self.indices[slot] += 1;
            if self.indices[slot] < self.partition.groups(slot).len() {
                return true;
            }
            self.indices[slot] = 0;
        }
        false
    }
}

impl<'a> Iterator for SetPermutations<'a> {
    type Item = SetConfiguration<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            let groups = self.configuration();
            self.exhausted = !self.turn();

            let signatures = groups.iter().map(|g| g.signature());
            if self.partition.signatures().is_satisfied_by(signatures) {
                return Some(SetConfiguration { groups });
            }
        }
        None
    }
}
