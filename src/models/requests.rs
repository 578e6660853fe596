use crate::core::SolverParams;
use crate::models::domain::{AlgorithmKind, MatchingInput, Provider, Requester};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Request to compute meetings for one event
///
/// Carries the `MatchingInput` fields plus optional per-request solver
/// overrides. Overrides can only tighten the configured budget.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComputeMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "event_id")]
    pub event_id: String,
    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub requesters: Vec<Requester>,
    #[serde(default)]
    pub algorithm: Option<AlgorithmKind>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub early_termination_threshold: Option<f64>,
}

impl ComputeMatchesRequest {
    /// Solver parameters for this request, starting from the configured ones
    pub fn solver_params(&self, configured: SolverParams) -> SolverParams {
        let mut params = configured;

        if let Some(max_iterations) = self.max_iterations {
            params.max_iterations = max_iterations.min(configured.max_iterations);
        }
        if let Some(time_limit_ms) = self.time_limit_ms {
            params.time_limit = Duration::from_millis(time_limit_ms).min(configured.time_limit);
        }
        if let Some(threshold) = self.early_termination_threshold {
            params.early_termination_threshold = threshold;
        }

        params
    }

    pub fn into_input(self) -> MatchingInput {
        MatchingInput {
            event_id: self.event_id,
            slots: self.slots,
            providers: self.providers,
            requesters: self.requesters,
        }
    }
}
