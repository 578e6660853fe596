// Core algorithm exports
pub mod bnb;
pub mod extract;
pub mod greedy;
pub mod local_search;
pub mod matcher;
pub mod params;
pub mod problem;
pub mod slots;
pub mod solution;
pub mod validation;

pub use bnb::{BnbOutcome, BnbStatistics, BranchAndBoundSolver, RelaxationOracle, SearchNode, TerminationReason};
pub use extract::{extract_meetings, extract_result};
pub use greedy::GreedySolver;
pub use local_search::LocalSearchRefiner;
pub use matcher::{ExactMatching, GreedyMatching, Matcher, MatchingAlgorithm, MatchingOutcome, SolveReport};
pub use params::SolverParams;
pub use problem::{Constraint, ConstraintFamily, ConstraintKind, Problem, Variable};
pub use solution::Solution;
pub use validation::validate_input;
