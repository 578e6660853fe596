use thiserror::Error;

/// Errors raised by the matching engine
///
/// Only structurally broken input or nonsensical solver parameters are
/// errors. An input with no possible meeting is a valid (empty) result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("invalid slot label '{0}': expected HH:MM-HH:MM with start before end")]
    InvalidSlotLabel(String),

    #[error("slot '{0}' is listed more than once")]
    DuplicateSlot(String),

    #[error("duplicate requester id: {0}")]
    DuplicateRequester(String),

    #[error("duplicate provider id: {0}")]
    DuplicateProvider(String),

    #[error("'{owner}' is available in slot '{slot}' which is not part of the event")]
    UnknownSlot { owner: String, slot: String },

    #[error("invalid solver parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
