use crate::core::problem::Problem;

/// A value vector over all variables plus its evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub values: Vec<f64>,
    pub objective_value: f64,
    pub is_feasible: bool,
}

impl Solution {
    /// Placeholder incumbent before anything has been found
    pub fn infeasible() -> Self {
        Self {
            values: Vec::new(),
            objective_value: f64::NEG_INFINITY,
            is_feasible: false,
        }
    }

    /// Score `values` against `problem`
    pub fn evaluate(problem: &Problem, values: Vec<f64>, tolerance: f64) -> Self {
        let objective_value = problem.objective_value(&values);
        let is_feasible = problem.is_feasible(&values, tolerance);
        Self {
            values,
            objective_value,
            is_feasible,
        }
    }

    /// Whether every value is within `tolerance` of an integer
    pub fn is_integral(&self, tolerance: f64) -> bool {
        self.values.iter().all(|&v| fractionality(v) <= tolerance)
    }

    /// Indices of variables set to 1
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0.5)
            .map(|(i, _)| i)
    }

    /// Whether this solution should replace `incumbent`
    pub fn improves_on(&self, incumbent: &Solution) -> bool {
        self.is_feasible && (!incumbent.is_feasible || self.objective_value > incumbent.objective_value)
    }
}

/// Distance from `value` to the nearest integer
#[inline]
pub fn fractionality(value: f64) -> f64 {
    (value - value.floor()).min(value.ceil() - value)
}

/// Index of the most fractional value, first occurrence on ties
///
/// Values within `tolerance` of an integer are not fractional.
pub fn most_fractional(values: &[f64], tolerance: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, &value) in values.iter().enumerate() {
        let distance = fractionality(value);
        if distance <= tolerance {
            continue;
        }
        if best.map_or(true, |(_, current)| distance > current) {
            best = Some((i, distance));
        }
    }

    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fractionality() {
        assert_eq!(fractionality(0.0), 0.0);
        assert_eq!(fractionality(1.0), 0.0);
        assert!((fractionality(0.25) - 0.25).abs() < 1e-12);
        assert!((fractionality(0.75) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_most_fractional_prefers_closest_to_half() {
        assert_eq!(most_fractional(&[0.0, 0.3, 0.5, 0.9], 1e-6), Some(2));
        assert_eq!(most_fractional(&[0.0, 1.0, 1.0 - 1e-9], 1e-6), None);
    }

    #[test]
    fn test_most_fractional_ties_pick_first() {
        assert_eq!(most_fractional(&[1.0, 0.25, 0.5, 0.5], 1e-6), Some(2));
    }

    #[test]
    fn test_selected_and_integrality() {
        let solution = Solution {
            values: vec![1.0, 0.0, 1.0],
            objective_value: 3.0,
            is_feasible: true,
        };
        assert_eq!(solution.selected().collect::<Vec<_>>(), vec![0, 2]);
        assert!(solution.is_integral(1e-6));
    }

    #[test]
    fn test_improves_on() {
        let placeholder = Solution::infeasible();
        let found = Solution {
            values: vec![1.0],
            objective_value: 0.0,
            is_feasible: true,
        };
        assert!(found.improves_on(&placeholder));
        assert!(!found.improves_on(&found.clone()));
        assert!(!placeholder.improves_on(&found));
    }
}
