//! # Learning Core
//!
//! The personalization side of Pathwise. This crate reads the catalog and
//! learner records through store contracts, ranks content with the rules from
//! `learning_rules`, and talks to a remote text-generation service for
//! practice questions and tutoring chat.
//!
//! ## Core Components
//!
//! - **personalization**: The path engine (filter, score, sort, truncate)
//! - **generation**: Question and chat generation with deterministic fallbacks
//! - **store**: Catalog, profile and interaction-history contracts plus in-memory stores
//! - **service**: The facade request handlers call
//!
//! ## Failure Policy
//!
//! - A catalog that cannot be read fails the request (`StoreUnavailable`)
//! - A malformed unit only loses its tags, never the request
//! - A generation provider outage is never visible to the learner

pub mod config;
pub mod error;
pub mod generation;
pub mod personalization;
pub mod service;
pub mod store;

pub use config::*;
pub use error::*;
pub use generation::{GenerationAdapter, Question, QuestionDifficulty};
pub use personalization::*;
pub use service::*;
pub use store::*;
