use crate::core::problem::Problem;
use crate::core::solution::Solution;
use crate::models::{MatchingInput, Meeting, MatchingResult};
use std::collections::HashSet;

/// Turn a solved value vector into meeting records
///
/// Every variable above 0.5 becomes a meeting, in variable index order.
pub fn extract_meetings(problem: &Problem, solution: &Solution, event_id: &str) -> Vec<Meeting> {
    solution
        .selected()
        .filter_map(|i| problem.variables().get(i))
        .map(|variable| Meeting {
            event_id: event_id.to_string(),
            provider_id: variable.provider_id.clone(),
            requester_id: variable.requester_id.clone(),
            slot: variable.slot.clone(),
        })
        .collect()
}

/// Ids from `all` that do not appear in `matched`, keeping input order
pub fn unmatched_ids<'a, I>(all: I, matched: &HashSet<&str>) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    all.into_iter()
        .filter(|id| !matched.contains(id))
        .map(str::to_string)
        .collect()
}

/// Meetings plus unmatched requesters and providers, without timing
pub fn extract_result(problem: &Problem, solution: &Solution, input: &MatchingInput) -> MatchingResult {
    let meetings = extract_meetings(problem, solution, &input.event_id);

    let matched_requesters: HashSet<&str> =
        meetings.iter().map(|m| m.requester_id.as_str()).collect();
    let matched_providers: HashSet<&str> =
        meetings.iter().map(|m| m.provider_id.as_str()).collect();

    let unmatched_requesters = unmatched_ids(
        input.requesters.iter().map(|r| r.id.as_str()),
        &matched_requesters,
    );
    let unmatched_providers = unmatched_ids(
        input.providers.iter().map(|p| p.id.as_str()),
        &matched_providers,
    );

    MatchingResult {
        meetings,
        unmatched_requesters,
        unmatched_providers,
        time_taken_seconds: None,
    }
}
