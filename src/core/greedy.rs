use crate::core::params::DEFAULT_TOLERANCE;
use crate::core::problem::Problem;
use crate::core::solution::Solution;
use std::cmp::Ordering;

/// Weight-ordered greedy assignment
///
/// Visits variables from heaviest to lightest (generation order on ties) and
/// switches each one on if every constraint still holds. The all-zero vector
/// is feasible, so the result always is too.
#[derive(Debug, Clone, Copy)]
pub struct GreedySolver {
    tolerance: f64,
}

impl GreedySolver {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn solve(&self, problem: &Problem) -> Solution {
        let objective = problem.objective();
        let mut order: Vec<usize> = (0..problem.num_variables()).collect();
        // stable, so equal weights keep generation order
        order.sort_by(|&a, &b| {
            objective[b]
                .partial_cmp(&objective[a])
                .unwrap_or(Ordering::Equal)
        });

        let mut values = vec![0.0; problem.num_variables()];
        let mut activities = vec![0.0; problem.constraints().len()];

        for var in order {
            if problem.admits_shift(var, 1.0, &activities, self.tolerance) {
                values[var] = 1.0;
                problem.shift(var, 1.0, &mut activities);
            }
        }

        let objective_value = problem.objective_value(&values);
        tracing::trace!(
            "Greedy selected {} of {} variables (objective {})",
            values.iter().filter(|&&v| v > 0.5).count(),
            values.len(),
            objective_value
        );

        Solution {
            values,
            objective_value,
            is_feasible: true,
        }
    }
}

impl Default for GreedySolver {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchingInput, Provider, Requester};

    const A: &str = "10:00-10:30";
    const B: &str = "10:30-11:00";

    #[test]
    fn test_prefers_heavier_variables() {
        // s1 wants f1 over f2, both only free in A
        let input = MatchingInput {
            event_id: "e".to_string(),
            slots: vec![A.to_string()],
            providers: vec![Provider::new("f1", [A]), Provider::new("f2", [A])],
            requesters: vec![Requester::new("s1", ["f1", "f2"], [A])],
        };
        let problem = Problem::build(&input, 2.0);
        let solution = GreedySolver::default().solve(&problem);

        assert!(solution.is_feasible);
        assert_eq!(solution.values, vec![1.0, 0.0]);
        assert_eq!(solution.objective_value, 2.0);
    }

    #[test]
    fn test_ties_follow_generation_order() {
        let input = MatchingInput {
            event_id: "e".to_string(),
            slots: vec![A.to_string()],
            providers: vec![Provider::new("f1", [A])],
            requesters: vec![
                Requester::new("s1", ["f1"], [A]),
                Requester::new("s2", ["f1"], [A]),
            ],
        };
        let problem = Problem::build(&input, 2.0);
        let solution = GreedySolver::default().solve(&problem);
        assert_eq!(solution.values, vec![1.0, 0.0]);
    }

    #[test]
    fn test_spreads_over_slots() {
        let input = MatchingInput {
            event_id: "e".to_string(),
            slots: vec![A.to_string(), B.to_string()],
            providers: vec![Provider::new("f1", [A, B])],
            requesters: vec![
                Requester::new("s1", ["f1"], [A, B]),
                Requester::new("s2", ["f1"], [A, B]),
            ],
        };
        let problem = Problem::build(&input, 2.0);
        let solution = GreedySolver::default().solve(&problem);

        assert!(problem.is_feasible(&solution.values, 1e-6));
        // s1 takes A, s2 falls through to B
        assert_eq!(solution.values, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_empty_problem() {
        let problem = Problem::build(
            &MatchingInput {
                event_id: "e".to_string(),
                slots: vec![],
                providers: vec![],
                requesters: vec![],
            },
            2.0,
        );
        let solution = GreedySolver::default().solve(&problem);
        assert!(solution.is_feasible);
        assert!(solution.values.is_empty());
        assert_eq!(solution.objective_value, 0.0);
    }
}
