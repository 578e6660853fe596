//! Single-flip local search used as the relaxation oracle of the exact
//! solver.
//!
//! This is a heuristic, not a linear-program relaxation: the value it
//! reports for a node is the objective of a feasible 0/1 point inside the
//! node's box, so it can under-estimate what the box really admits. Pruning
//! against it is therefore approximate. The `RelaxationOracle` seam lets a
//! true LP bound replace it.

use crate::core::bnb::{RelaxationOracle, SearchNode};
use crate::core::params::{DEFAULT_LOCAL_SEARCH_PASSES, DEFAULT_TOLERANCE};
use crate::core::problem::Problem;
use crate::core::solution::Solution;
use std::cmp::Ordering;

/// Improves a fixed starting point inside each node's bounds
#[derive(Debug, Clone)]
pub struct LocalSearchRefiner {
    start: Solution,
    max_passes: usize,
    tolerance: f64,
}

impl LocalSearchRefiner {
    pub fn new(start: Solution, max_passes: usize, tolerance: f64) -> Self {
        Self {
            start,
            max_passes,
            tolerance,
        }
    }

    /// Refiner seeded with `start` and the default pass cap and tolerance
    pub fn with_start(start: Solution) -> Self {
        Self::new(start, DEFAULT_LOCAL_SEARCH_PASSES, DEFAULT_TOLERANCE)
    }

    /// Best point found from the start inside `[lower, upper]`
    ///
    /// The start is clamped into the box, then free variables sitting in an
    /// over-full row are cleared (lightest first). After that each pass tries
    /// every single flip and keeps those that stay in the box, stay feasible
    /// and strictly raise the objective. Stops after a pass with no accepted
    /// flip or after `max_passes` passes.
    pub fn refine(&self, problem: &Problem, lower: &[f64], upper: &[f64]) -> Solution {
        let n = problem.num_variables();
        let tol = self.tolerance;

        if lower.len() != n || upper.len() != n || lower.iter().zip(upper).any(|(l, u)| l > u) {
            return Solution::infeasible();
        }

        let mut values: Vec<f64> = (0..n)
            .map(|i| {
                let start = self.start.values.get(i).copied().unwrap_or(0.0);
                start.max(lower[i]).min(upper[i])
            })
            .collect();
        let mut activities = problem.activities(&values);

        self.repair(problem, lower, &mut values, &mut activities);
        if !problem.activities_feasible(&activities, tol) {
            return Solution::evaluate(problem, values, tol);
        }

        let objective = problem.objective();
        let mut passes = 0;
        while passes < self.max_passes {
            passes += 1;
            let mut improved = false;

            for var in 0..n {
                let flipped = if values[var] > 0.5 { 0.0 } else { 1.0 };
                if flipped < lower[var] - tol || flipped > upper[var] + tol {
                    continue;
                }

                let delta = flipped - values[var];
                if objective[var] * delta <= 0.0 {
                    continue;
                }
                if !problem.admits_shift(var, delta, &activities, tol) {
                    continue;
                }

                values[var] = flipped;
                problem.shift(var, delta, &mut activities);
                improved = true;
            }

            if !improved {
                break;
            }
        }

        tracing::trace!("Local search finished after {} pass(es)", passes);
        Solution::evaluate(problem, values, tol)
    }

    fn repair(&self, problem: &Problem, lower: &[f64], values: &mut [f64], activities: &mut [f64]) {
        let objective = problem.objective();
        let mut candidates: Vec<usize> = (0..values.len())
            .filter(|&i| values[i] > lower[i] + self.tolerance)
            .collect();
        candidates.sort_by(|&a, &b| {
            objective[a]
                .partial_cmp(&objective[b])
                .unwrap_or(Ordering::Equal)
        });

        for var in candidates {
            if problem.in_violated_row(var, activities, self.tolerance) {
                let delta = lower[var] - values[var];
                values[var] = lower[var];
                problem.shift(var, delta, activities);
            }
        }
    }
}

impl RelaxationOracle for LocalSearchRefiner {
    fn relax(&mut self, problem: &Problem, node: &SearchNode) -> Solution {
        self.refine(problem, &node.lower, &node.upper)
    }
}
