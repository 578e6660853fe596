// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{AlgorithmKind, MatchingInput, MatchingResult, Meeting, Provider, Requester};
pub use requests::ComputeMatchesRequest;
pub use responses::{ComputeMatchesResponse, ErrorResponse, HealthResponse};
