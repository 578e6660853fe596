use crate::core::SolveReport;
use crate::models::domain::MatchingResult;
use serde::{Deserialize, Serialize};

/// Response for the compute endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeMatchesResponse {
    pub run_id: String,
    pub result: MatchingResult,
    pub report: SolveReport,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
