use serde::{Deserialize, Serialize};
use std::fmt;

/// A provider (faculty member) and the slots they can meet in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    #[serde(default)]
    pub available_slots: Vec<String>,
}

impl Provider {
    pub fn new<I, S>(id: impl Into<String>, available_slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            available_slots: available_slots.into_iter().map(Into::into).collect(),
        }
    }
}

/// A requester (student) with ranked provider preferences
///
/// `preferences` is ordered best first: index 0 is the most wanted provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub id: String,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub available_slots: Vec<String>,
}

impl Requester {
    pub fn new<P, S, I, T>(id: impl Into<String>, preferences: P, available_slots: I) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            id: id.into(),
            preferences: preferences.into_iter().map(Into::into).collect(),
            available_slots: available_slots.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything the engine needs to schedule one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingInput {
    pub event_id: String,
    /// Slot labels in `HH:MM-HH:MM` form, in event order
    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub requesters: Vec<Requester>,
}

/// A scheduled meeting between one requester and one provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub event_id: String,
    pub provider_id: String,
    pub requester_id: String,
    pub slot: String,
}

/// Final assignment handed back to the caller for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResult {
    pub meetings: Vec<Meeting>,
    pub unmatched_requesters: Vec<String>,
    pub unmatched_providers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_seconds: Option<f64>,
}

/// Which matching algorithm to run
///
/// Older clients still send the names of algorithms that were only ever
/// greedy under the hood; those names resolve to `Greedy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmKind {
    #[serde(alias = "dummy", alias = "network_flow", alias = "networkflow")]
    Greedy,
    #[default]
    #[serde(alias = "branch_and_bound", alias = "integer_programming", alias = "ip")]
    Exact,
}

impl AlgorithmKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Greedy => "greedy",
            AlgorithmKind::Exact => "exact",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_uses_camel_case() {
        let json = r#"{
            "eventId": "open-house",
            "slots": ["09:00-09:15"],
            "providers": [{ "id": "f1", "availableSlots": ["09:00-09:15"] }],
            "requesters": [{ "id": "s1", "preferences": ["f1"], "availableSlots": ["09:00-09:15"] }]
        }"#;

        let input: MatchingInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.event_id, "open-house");
        assert_eq!(input.providers[0].available_slots, vec!["09:00-09:15"]);
        assert_eq!(input.requesters[0].preferences, vec!["f1"]);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let input: MatchingInput =
            serde_json::from_str(r#"{ "eventId": "e", "requesters": [{ "id": "s1" }] }"#).unwrap();
        assert!(input.slots.is_empty());
        assert!(input.providers.is_empty());
        assert!(input.requesters[0].preferences.is_empty());
    }

    #[test]
    fn test_time_taken_omitted_when_absent() {
        let result = MatchingResult {
            meetings: vec![],
            unmatched_requesters: vec!["s1".to_string()],
            unmatched_providers: vec![],
            time_taken_seconds: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("timeTakenSeconds").is_none());
        assert_eq!(json["unmatchedRequesters"][0], "s1");
    }

    #[test]
    fn test_legacy_algorithm_names_collapse_to_greedy() {
        for name in ["\"greedy\"", "\"dummy\"", "\"network_flow\""] {
            let kind: AlgorithmKind = serde_json::from_str(name).unwrap();
            assert_eq!(kind, AlgorithmKind::Greedy);
        }
        let kind: AlgorithmKind = serde_json::from_str("\"branch_and_bound\"").unwrap();
        assert_eq!(kind, AlgorithmKind::Exact);
        assert_eq!(AlgorithmKind::default().to_string(), "exact");
    }
}
