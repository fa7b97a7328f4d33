//! Hand-written pools with known optimal builds.
//!
//! # Example
//!
//! ```
//! use buildforge_test::scenario::two_slot_atk_pool;
//!
//! let pool = two_slot_atk_pool();
//! assert_eq!(pool.slot_count(), 2);
//! assert_eq!(pool.candidate_count(), 4);
//! ```

use buildforge_core::{Candidate, SlotPool};

/// Two slots with two `atk` candidates each: `{10, 20}` and `{5, 15}`.
///
/// The four builds sum to 15, 25, 25 and 35.
pub fn two_slot_atk_pool() -> SlotPool {
    SlotPool::from_candidates([
        Candidate::new("flower-10", "flower").with_stat("atk", 10.0),
        Candidate::new("flower-20", "flower").with_stat("atk", 20.0),
        Candidate::new("plume-5", "plume").with_stat("atk", 5.0),
        Candidate::new("plume-15", "plume").with_stat("atk", 15.0),
    ])
}

/// Two slots where set `"x"` appears on a single flower only.
///
/// A filter requiring two pieces of `"x"` can never be satisfied.
pub fn lonely_set_pool() -> SlotPool {
    SlotPool::from_candidates([
        Candidate::new("flower-x", "flower")
            .with_set("x")
            .with_stat("atk", 10.0),
        Candidate::new("flower-y", "flower")
            .with_set("y")
            .with_stat("atk", 12.0),
        Candidate::new("plume-y", "plume")
            .with_set("y")
            .with_stat("atk", 7.0),
        Candidate::new("plume-z", "plume")
            .with_set("z")
            .with_stat("atk", 9.0),
    ])
}

/// Three slots mixing two sets, for set filter tests.
///
/// Every slot offers one `"gladiator"` piece, one `"maiden"` piece and one
/// piece of an unfiltered set, with `hp` and `atk` traded off.
pub fn mixed_set_pool() -> SlotPool {
    let mut candidates = Vec::new();
    for (slot, offset) in [("flower", 0.0), ("plume", 1.0), ("sands", 2.0)] {
        candidates.push(
            Candidate::new(format!("{slot}-glad"), slot)
                .with_set("gladiator")
                .with_stat("atk", 30.0 + offset)
                .with_stat("hp", 100.0),
        );
        candidates.push(
            Candidate::new(format!("{slot}-maiden"), slot)
                .with_set("maiden")
                .with_stat("atk", 10.0 + offset)
                .with_stat("hp", 400.0),
        );
        candidates.push(
            Candidate::new(format!("{slot}-wanderer"), slot)
                .with_set("wanderer")
                .with_stat("atk", 35.0 + offset)
                .with_stat("hp", 50.0),
        );
    }
    SlotPool::from_candidates(candidates)
}
