//! Shared test fixtures for BuildForge crates.
//!
//! This crate provides candidate pools and brute-force oracles for testing.
//! It depends only on `buildforge-core` so every crate can use it.
//!
//! - [`scenario`] - Small hand-written pools with known answers
//! - [`random`] - Seeded random pools for property tests
//! - [`oracle`] - Naive enumeration to check the optimizer against
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! buildforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use buildforge_test::scenario::two_slot_atk_pool;
//! use buildforge_test::random::RandomPoolSpec;
//! ```

pub mod oracle;
pub mod random;
pub mod scenario;

// Re-export commonly used fixtures at crate root for convenience
pub use oracle::{all_combinations, satisfies_set_filters};
pub use random::RandomPoolSpec;
pub use scenario::two_slot_atk_pool;
