use crate::error::MatchError;
use std::time::Duration;

pub const DEFAULT_MAX_ITERATIONS: usize = 5000;
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_EARLY_TERMINATION_THRESHOLD: f64 = 0.95;
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_LOCAL_SEARCH_PASSES: usize = 50;
pub const DEFAULT_PREFERENCE_WEIGHT_BASE: f64 = 2.0;

/// Tunables shared by every solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// Hard cap on branch-and-bound node evaluations
    pub max_iterations: usize,
    /// Wall-clock budget, checked once per search iteration
    pub time_limit: Duration,
    /// Stop once the incumbent reaches this fraction of the node bound
    pub early_termination_threshold: f64,
    /// Integrality and constraint tolerance
    pub tolerance: f64,
    /// Pass cap for the local-search refiner
    pub local_search_passes: usize,
    /// Base of the exponential preference weighting
    pub preference_weight_base: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            time_limit: DEFAULT_TIME_LIMIT,
            early_termination_threshold: DEFAULT_EARLY_TERMINATION_THRESHOLD,
            tolerance: DEFAULT_TOLERANCE,
            local_search_passes: DEFAULT_LOCAL_SEARCH_PASSES,
            preference_weight_base: DEFAULT_PREFERENCE_WEIGHT_BASE,
        }
    }
}

impl SolverParams {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_early_termination_threshold(mut self, threshold: f64) -> Self {
        self.early_termination_threshold = threshold;
        self
    }

    /// Reject parameter combinations the solvers cannot work with
    pub fn validate(&self) -> Result<(), MatchError> {
        let threshold = self.early_termination_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(MatchError::InvalidParameter {
                name: "early_termination_threshold",
                reason: format!("must be in (0, 1], got {}", threshold),
            });
        }

        if !(self.tolerance > 0.0 && self.tolerance < 0.5) {
            return Err(MatchError::InvalidParameter {
                name: "tolerance",
                reason: format!("must be in (0, 0.5), got {}", self.tolerance),
            });
        }

        if !(self.preference_weight_base > 1.0 && self.preference_weight_base.is_finite()) {
            return Err(MatchError::InvalidParameter {
                name: "preference_weight_base",
                reason: format!("must be a finite number above 1, got {}", self.preference_weight_base),
            });
        }

        Ok(())
    }
}
