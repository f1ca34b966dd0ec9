//! # Learning Rules
//!
//! The "rule book" crate - content units, learner profiles and the static
//! personalization rules. This crate is the single source of truth for catalog
//! data shapes and does not contain any store, engine or AI logic.

pub mod catalog;
pub mod error;
pub mod learner;
pub mod rule_set;

pub use catalog::*;
pub use error::*;
pub use learner::*;
pub use rule_set::*;
