//! Slot Match - preference-weighted meeting slot matching service
//!
//! This library schedules meetings between requesters and providers for a
//! single event. Every requester ranks the providers they want to meet and
//! both sides list the slots they are free in; the engine picks a set of
//! (requester, provider, slot) meetings that never double-books anyone and
//! maximizes total preference satisfaction.
//!
//! The exact path is a best-first branch-and-bound seeded by a greedy
//! assignment, with a greedy fallback when the search runs out of budget.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{Matcher, MatchingAlgorithm, MatchingOutcome, SolverParams};
pub use error::MatchError;
pub use models::{AlgorithmKind, MatchingInput, MatchingResult, Meeting, Provider, Requester};
