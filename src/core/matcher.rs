use crate::core::bnb::{BnbStatistics, BranchAndBoundSolver, TerminationReason};
use crate::core::extract::extract_result;
use crate::core::greedy::GreedySolver;
use crate::core::params::SolverParams;
use crate::core::problem::Problem;
use crate::core::solution::Solution;
use crate::core::validation::validate_input;
use crate::error::MatchError;
use crate::models::{AlgorithmKind, MatchingInput, MatchingResult};
use serde::Serialize;
use std::time::Instant;

/// How a result was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub algorithm: AlgorithmKind,
    pub variables: usize,
    pub constraints: usize,
    pub objective_value: f64,
    /// The exact search gave nothing usable and greedy was used instead
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<BnbStatistics>,
}

/// Result envelope plus its solve report
#[derive(Debug, Clone)]
pub struct MatchingOutcome {
    pub result: MatchingResult,
    pub report: SolveReport,
}

/// A way of turning a `MatchingInput` into meetings
pub trait MatchingAlgorithm {
    fn kind(&self) -> AlgorithmKind;

    fn compute_matches(&self, input: &MatchingInput) -> Result<MatchingOutcome, MatchError>;
}

/// Greedy assignment only
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyMatching {
    params: SolverParams,
}

impl GreedyMatching {
    pub fn new(params: SolverParams) -> Self {
        Self { params }
    }
}

impl MatchingAlgorithm for GreedyMatching {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Greedy
    }

    fn compute_matches(&self, input: &MatchingInput) -> Result<MatchingOutcome, MatchError> {
        let started = Instant::now();
        let problem = prepare(input, &self.params)?;

        let solution = GreedySolver::new(self.params.tolerance).solve(&problem);
        let report = SolveReport {
            algorithm: self.kind(),
            variables: problem.num_variables(),
            constraints: problem.constraints().len(),
            objective_value: solution.objective_value,
            used_fallback: false,
            termination: None,
            stats: None,
        };

        Ok(finish(&problem, &solution, input, report, started))
    }
}

/// Branch-and-bound with a greedy safety net
///
/// If the exact search ends without a feasible solution, or with one whose
/// objective is not positive, the greedy assignment is returned instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatching {
    params: SolverParams,
}

impl ExactMatching {
    pub fn new(params: SolverParams) -> Self {
        Self { params }
    }
}

impl MatchingAlgorithm for ExactMatching {
    fn kind(&self) -> AlgorithmKind {
        AlgorithmKind::Exact
    }

    fn compute_matches(&self, input: &MatchingInput) -> Result<MatchingOutcome, MatchError> {
        let started = Instant::now();
        let problem = prepare(input, &self.params)?;

        let outcome = BranchAndBoundSolver::new(self.params).solve(&problem);
        let usable = outcome.solution.is_feasible && outcome.solution.objective_value > 0.0;

        let solution = if usable {
            outcome.solution
        } else {
            if problem.is_empty() {
                tracing::debug!("No candidate meetings for event {}", input.event_id);
            } else {
                tracing::warn!(
                    "Exact search for event {} ended without a usable solution ({}), falling back to greedy",
                    input.event_id,
                    outcome.termination
                );
            }
            GreedySolver::new(self.params.tolerance).solve(&problem)
        };

        let report = SolveReport {
            algorithm: self.kind(),
            variables: problem.num_variables(),
            constraints: problem.constraints().len(),
            objective_value: solution.objective_value,
            used_fallback: !usable,
            termination: Some(outcome.termination),
            stats: Some(outcome.statistics),
        };

        Ok(finish(&problem, &solution, input, report, started))
    }
}

/// Entry point used by the service: picks the algorithm and runs it
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    algorithm: AlgorithmKind,
    params: SolverParams,
}

impl Matcher {
    pub fn new(algorithm: AlgorithmKind, params: SolverParams) -> Self {
        Self { algorithm, params }
    }

    #[inline]
    pub fn algorithm_kind(&self) -> AlgorithmKind {
        self.algorithm
    }

    #[inline]
    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn algorithm(&self) -> Box<dyn MatchingAlgorithm + Send + Sync> {
        match self.algorithm {
            AlgorithmKind::Greedy => Box::new(GreedyMatching::new(self.params)),
            AlgorithmKind::Exact => Box::new(ExactMatching::new(self.params)),
        }
    }

    /// Compute meetings for one event
    pub fn compute_matches(&self, input: &MatchingInput) -> Result<MatchingOutcome, MatchError> {
        self.algorithm().compute_matches(input)
    }
}

fn prepare(input: &MatchingInput, params: &SolverParams) -> Result<Problem, MatchError> {
    params.validate()?;
    validate_input(input)?;

    let problem = Problem::build(input, params.preference_weight_base);
    tracing::debug!(
        "Built model for event {}: {} variables, {} constraints",
        input.event_id,
        problem.num_variables(),
        problem.constraints().len()
    );
    Ok(problem)
}

fn finish(
    problem: &Problem,
    solution: &Solution,
    input: &MatchingInput,
    report: SolveReport,
    started: Instant,
) -> MatchingOutcome {
    let mut result = extract_result(problem, solution, input);
    result.time_taken_seconds = Some(started.elapsed().as_secs_f64());

    tracing::info!(
        "Scheduled {} meetings for event {} with {} ({} requesters and {} providers unmatched)",
        result.meetings.len(),
        input.event_id,
        report.algorithm,
        result.unmatched_requesters.len(),
        result.unmatched_providers.len()
    );

    MatchingOutcome { result, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Provider, Requester};

    const A: &str = "15:00-15:15";
    const B: &str = "15:15-15:30";

    fn input() -> MatchingInput {
        MatchingInput {
            event_id: "advising".to_string(),
            slots: vec![A.to_string(), B.to_string()],
            providers: vec![Provider::new("f1", [A, B]), Provider::new("f2", [A])],
            requesters: vec![
                Requester::new("s1", ["f1", "f2"], [A, B]),
                Requester::new("s2", ["f2", "f1"], [A]),
            ],
        }
    }

    #[test]
    fn test_exact_matching() {
        let outcome = Matcher::default().compute_matches(&input()).unwrap();

        assert_eq!(outcome.report.algorithm, AlgorithmKind::Exact);
        assert!(!outcome.report.used_fallback);
        assert_eq!(outcome.result.meetings.len(), 2);
        assert!(outcome.result.unmatched_requesters.is_empty());
        assert!(outcome.result.unmatched_providers.is_empty());
        assert!(outcome.result.time_taken_seconds.is_some());
        assert!(outcome.report.stats.is_some());
    }

    #[test]
    fn test_greedy_matching() {
        let matcher = Matcher::new(AlgorithmKind::Greedy, SolverParams::default());
        let outcome = matcher.compute_matches(&input()).unwrap();

        assert_eq!(outcome.report.algorithm, AlgorithmKind::Greedy);
        assert!(outcome.report.termination.is_none());
        assert_eq!(outcome.result.meetings.len(), 2);
    }

    #[test]
    fn test_zero_iterations_falls_back_to_greedy() {
        let params = SolverParams::default().with_max_iterations(0);
        let outcome = ExactMatching::new(params).compute_matches(&input()).unwrap();

        assert!(outcome.report.used_fallback);
        assert_eq!(outcome.report.termination, Some(TerminationReason::IterationLimit));
        let greedy = GreedyMatching::default().compute_matches(&input()).unwrap();
        assert_eq!(outcome.result.meetings, greedy.result.meetings);
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        let mut input = input();
        input.slots[0] = "morning".to_string();
        assert_eq!(
            Matcher::default().compute_matches(&input).unwrap_err(),
            MatchError::InvalidSlotLabel("morning".to_string())
        );
    }

    #[test]
    fn test_invalid_params_are_an_error() {
        let params = SolverParams::default().with_early_termination_threshold(2.0);
        let result = Matcher::new(AlgorithmKind::Exact, params).compute_matches(&input());
        assert!(matches!(result, Err(MatchError::InvalidParameter { .. })));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let outcome = Matcher::default().compute_matches(&input()).unwrap();
        let json = serde_json::to_value(&outcome.report).unwrap();
        assert_eq!(json["algorithm"], "exact");
        assert_eq!(json["usedFallback"], false);
        assert_eq!(json["termination"], "exhausted");
        assert!(json["stats"]["iterations"].as_u64().unwrap() >= 1);
    }
}
