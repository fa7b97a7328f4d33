//! Seeded random candidate pools.
//!
//! # Example
//!
//! ```
//! use buildforge_test::random::RandomPoolSpec;
//!
//! let spec = RandomPoolSpec::new(7).with_slots(3).with_candidates_per_slot(4);
//! let pool = spec.generate();
//!
//! assert_eq!(pool.slot_count(), 3);
//! assert_eq!(pool.candidate_count(), 12);
//! // Same seed, same pool
//! assert_eq!(pool, spec.generate());
//! ```

use buildforge_core::{Candidate, SlotPool};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Shape of a random pool.
#[derive(Debug, Clone)]
pub struct RandomPoolSpec {
    pub seed: u64,
    pub slots: usize,
    pub candidates_per_slot: usize,
    /// Set keys drawn from; each candidate joins one of them.
    pub sets: Vec<String>,
    /// Attribute keys drawn from; each candidate gets a random subset.
    pub stats: Vec<String>,
    /// Stat values are drawn uniformly from `0..max_value`.
    pub max_value: u32,
}

impl RandomPoolSpec {
    /// Two slots of three candidates over `atk`/`hp`/`crit` and two sets.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            slots: 2,
            candidates_per_slot: 3,
            sets: vec!["gladiator".to_string(), "maiden".to_string()],
            stats: vec!["atk".to_string(), "hp".to_string(), "crit".to_string()],
            max_value: 20,
        }
    }

    pub fn with_slots(mut self, slots: usize) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_candidates_per_slot(mut self, count: usize) -> Self {
        self.candidates_per_slot = count;
        self
    }

    pub fn with_sets(mut self, sets: &[&str]) -> Self {
        self.sets = sets.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_stats(mut self, stats: &[&str]) -> Self {
        self.stats = stats.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_max_value(mut self, max_value: u32) -> Self {
        self.max_value = max_value.max(1);
        self
    }

    /// Generates the pool. Stat values are whole numbers so sums are exact.
    pub fn generate(&self) -> SlotPool {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut pool = SlotPool::new();

        for slot_index in 0..self.slots {
            let slot = format!("slot{slot_index}");
            pool.add_slot(slot.clone());

            for candidate_index in 0..self.candidates_per_slot {
                let mut candidate =
                    Candidate::new(format!("{slot}-{candidate_index}"), slot.clone());
                if !self.sets.is_empty() {
                    let set = &self.sets[rng.random_range(0..self.sets.len())];
                    candidate = candidate.with_set(set.clone());
                }
                for stat in &self.stats {
                    if rng.random_bool(0.7) {
                        let value = rng.random_range(0..self.max_value) as f64;
                        candidate = candidate.with_stat(stat, value);
                    }
                }
                pool.push(candidate);
            }
        }
        pool
    }
}
