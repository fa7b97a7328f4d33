//! Incremental cartesian product walker.

use std::sync::Arc;

use buildforge_core::{AttributeBag, Candidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    /// Restarted, first combination not yet built.
    Fresh,
    Active,
    Done,
}

/// Walks one candidate per slot over a list of candidate slices.
///
/// `bags[d]` holds the base stats plus the contributions of slots `0..d`,
/// so `bags[n]` is the full raw sum of the current combination. A step
/// that changes slot `d` rebuilds only `bags[d + 1..]`. The bag buffers
/// are reused across steps and across restarts.
#[derive(Debug)]
pub struct CombinationWalker<'a> {
    slots: Vec<&'a [Arc<Candidate>]>,
    indices: Vec<usize>,
    bags: Vec<AttributeBag>,
    state: WalkState,
}

impl<'a> CombinationWalker<'a> {
    /// Creates an exhausted walker seeded with `base`.
    pub fn idle(base: &AttributeBag) -> Self {
        Self {
            slots: Vec::new(),
            indices: Vec::new(),
            bags: vec![base.clone()],
            state: WalkState::Done,
        }
    }

    /// Starts walking a new product. Nothing is produced if any slice is
    /// empty; a product of zero slices has one empty combination.
    pub fn restart(&mut self, slots: Vec<&'a [Arc<Candidate>]>) {
        let depth = slots.len();
        self.state = if slots.iter().any(|s| s.is_empty()) {
            WalkState::Done
        } else {
            WalkState::Fresh
        };
        self.slots = slots;
        self.indices.clear();
        self.indices.resize(depth, 0);
        self.bags.resize_with(depth + 1, AttributeBag::new);
    }

    /// Moves to the next combination. Returns false once exhausted.
    pub fn step(&mut self) -> bool {
        match self.state {
            WalkState::Done => false,
            WalkState::Fresh => {
                self.rebuild_from(0);
                self.state = WalkState::Active;
                true
            }
            WalkState::Active => {
                let Some(depth) = (0..self.slots.len())
                    .rev()
                    .find(|&d| self.indices[d] + 1 < self.slots[d].len())
                else {
                    self.state = WalkState::Done;
                    return false;
                };
                self.indices[depth] += 1;
                for index in &mut self.indices[depth + 1..] {
                    *index = 0;
                }
                self.rebuild_from(depth);
                true
            }
        }
    }

    fn rebuild_from(&mut self, depth: usize) {
        for d in depth..self.slots.len() {
            let (done, rest) = self.bags.split_at_mut(d + 1);
            let bag = &mut rest[0];
            bag.reset_from(&done[d]);
            bag.add_all(self.slots[d][self.indices[d]].stats());
        }
    }

    /// The current combination. Only meaningful after `step` returned true.
    pub fn current(&self) -> Combination<'_> {
        Combination {
            slots: &self.slots,
            indices: &self.indices,
            bag: &self.bags[self.slots.len()],
        }
    }
}

/// A borrowed view of one combination.
#[derive(Debug, Clone, Copy)]
pub struct Combination<'w> {
    slots: &'w [&'w [Arc<Candidate>]],
    indices: &'w [usize],
    bag: &'w AttributeBag,
}

impl<'w> Combination<'w> {
    /// Number of pieces (one per slot).
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The piece chosen for the slot at `index`.
    pub fn piece(&self, index: usize) -> &'w Arc<Candidate> {
        &self.slots[index][self.indices[index]]
    }

    /// Chosen pieces in slot order.
    pub fn pieces(&self) -> impl Iterator<Item = &'w Arc<Candidate>> + 'w {
        let slots = self.slots;
        self.indices
            .iter()
            .enumerate()
            .map(move |(slot, &index)| &slots[slot][index])
    }

    /// Copies the selection out of the walker.
    pub fn to_pieces(&self) -> Vec<Arc<Candidate>> {
        self.pieces().cloned().collect()
    }

    /// Base stats plus every piece's raw contribution.
    pub fn raw_stats(&self) -> &'w AttributeBag {
        self.bag
    }
}
