//! Structural checks on a `MatchingInput` before a model is built.
//!
//! Detects:
//! - malformed or repeated slot labels
//! - duplicate requester or provider ids
//! - availability in a slot the event does not have
//!
//! Preferences naming an unknown provider are deliberately not checked here;
//! the model builder skips them.

use crate::core::slots::is_valid_slot_label;
use crate::error::MatchError;
use crate::models::MatchingInput;
use std::collections::HashSet;

/// Validate an input, returning the first problem found
pub fn validate_input(input: &MatchingInput) -> Result<(), MatchError> {
    let mut event_slots = HashSet::with_capacity(input.slots.len());
    for slot in &input.slots {
        if !is_valid_slot_label(slot) {
            return Err(MatchError::InvalidSlotLabel(slot.clone()));
        }
        if !event_slots.insert(slot.as_str()) {
            return Err(MatchError::DuplicateSlot(slot.clone()));
        }
    }

    let mut provider_ids = HashSet::with_capacity(input.providers.len());
    for provider in &input.providers {
        if !provider_ids.insert(provider.id.as_str()) {
            return Err(MatchError::DuplicateProvider(provider.id.clone()));
        }
        check_availability(&provider.id, &provider.available_slots, &event_slots)?;
    }

    let mut requester_ids = HashSet::with_capacity(input.requesters.len());
    for requester in &input.requesters {
        if !requester_ids.insert(requester.id.as_str()) {
            return Err(MatchError::DuplicateRequester(requester.id.clone()));
        }
        check_availability(&requester.id, &requester.available_slots, &event_slots)?;
    }

    Ok(())
}

fn check_availability(
    owner: &str,
    available_slots: &[String],
    event_slots: &HashSet<&str>,
) -> Result<(), MatchError> {
    for slot in available_slots {
        if !is_valid_slot_label(slot) {
            return Err(MatchError::InvalidSlotLabel(slot.clone()));
        }
        if !event_slots.contains(slot.as_str()) {
            return Err(MatchError::UnknownSlot {
                owner: owner.to_string(),
                slot: slot.clone(),
            });
        }
    }
    Ok(())
}
