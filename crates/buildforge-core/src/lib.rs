//! BuildForge Core - Core types and traits for build optimization
//!
//! This crate provides the fundamental abstractions for BuildForge:
//! - Attribute bags for accumulating numeric contributions
//! - Candidates and slot pools describing the equipment on offer
//! - Set filters, stat bounds and set bonuses constraining a build
//! - Objectives and formula keys selecting what to optimize
//! - The stat model traits (dependency resolution, derived evaluation)
//!   and a linear modifier graph implementing them

pub mod attribute;
pub mod candidate;
pub mod error;
pub mod filter;
pub mod objective;
pub mod set_effect;
pub mod stat;

pub use attribute::{AttrKey, AttributeBag, SetKey, SlotKey};
pub use candidate::{Candidate, SlotPool};
pub use error::{BuildForgeError, Result};
pub use filter::{SetFilter, StatBounds};
pub use objective::{FormulaKey, Objective, SortDirection};
pub use set_effect::{SetBonus, SetEffects};
pub use stat::{CompiledStats, DependencyResolver, InitialStats, Modifier, ModifierGraph, StatEvaluator};
