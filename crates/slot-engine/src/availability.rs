//! Availability queries for one person or for a group of attendees.
//!
//! Composes the weekly matcher ([`crate::weekly::matches`]) and the buffered
//! conflict detector ([`crate::conflict::conflicts`]) over single slots or over
//! every slot the generator emits for a range. Inputs are validated once, up
//! front; a query either fails validation or returns a complete answer.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::conflict::{self, Event};
use crate::error::{Result, SlotError};
use crate::slots::{Slot, SlotGenerator, SlotRange, DEFAULT_GRANULARITY_MINUTES};
use crate::weekly::{self, Availability};

/// One participant in a multi-person query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub availability: Availability,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Attendee {
    pub fn new(availability: Availability, events: Vec<Event>) -> Self {
        Self {
            availability,
            events,
        }
    }

    fn is_free(&self, slot: &Slot) -> bool {
        slot_is_free(&self.availability, &self.events, slot)
    }
}

/// Matcher first, then the detector. Assumes inputs are already validated.
fn slot_is_free(availability: &Availability, events: &[Event], slot: &Slot) -> bool {
    if !weekly::matches(availability, slot) {
        return false;
    }
    match conflict::first_conflict(events, slot) {
        Some(event) => {
            trace!(
                slot_start = %slot.start,
                event_start = %event.start,
                event_end = %event.end,
                "slot blocked by event"
            );
            false
        }
        None => true,
    }
}

fn validate_attendees(attendees: &[Attendee]) -> Result<()> {
    if attendees.is_empty() {
        return Err(SlotError::InvalidInput(
            "at least one attendee is required".to_string(),
        ));
    }
    attendees
        .iter()
        .try_for_each(|attendee| attendee.availability.validate())
}

/// Whether `slot` is bookable against `availability` and `events`.
///
/// The slot must sit inside a weekly window and must not overlap any buffered
/// event. Pass an empty `events` slice to check availability alone; events
/// without a buffer give the plain overlap check.
///
/// # Errors
/// Returns `SlotError::InvalidInput` for a zero-length slot or an out-of-range
/// weekday or time of day in `availability`.
pub fn is_available(availability: &Availability, events: &[Event], slot: &Slot) -> Result<bool> {
    availability.validate()?;
    slot.validate()?;
    Ok(slot_is_free(availability, events, slot))
}

/// Every 30-minute slot starting in `range` that is bookable for one person.
///
/// Output keeps generator order: chronological, no duplicates.
pub fn list_available_slots(
    availability: &Availability,
    events: &[Event],
    range: &SlotRange,
) -> Result<Vec<Slot>> {
    availability.validate()?;
    let candidates = SlotGenerator::new(range, DEFAULT_GRANULARITY_MINUTES)?;

    let available: Vec<Slot> = candidates
        .filter(|slot| slot_is_free(availability, events, slot))
        .collect();

    debug!(
        range_start = %range.start,
        range_end = %range.end,
        events = events.len(),
        available = available.len(),
        "listed available slots"
    );
    Ok(available)
}

/// Every 30-minute slot starting in `range` that is bookable for all attendees.
///
/// A slot is kept only when each attendee independently passes the matcher and
/// the detector. Evaluation stops at the first attendee who is not free; the
/// order of attendees never changes the result.
///
/// # Errors
/// Returns `SlotError::InvalidInput` when `attendees` is empty, when any
/// availability is out of range, or when `range` is reversed.
pub fn list_available_slots_for_all(attendees: &[Attendee], range: &SlotRange) -> Result<Vec<Slot>> {
    validate_attendees(attendees)?;
    let candidates = SlotGenerator::new(range, DEFAULT_GRANULARITY_MINUTES)?;

    let available: Vec<Slot> = candidates
        .filter(|slot| attendees.iter().all(|attendee| attendee.is_free(slot)))
        .collect();

    debug!(
        range_start = %range.start,
        range_end = %range.end,
        attendees = attendees.len(),
        available = available.len(),
        "listed mutually available slots"
    );
    Ok(available)
}

/// The earliest 30-minute slot in `range` that is bookable for all attendees.
///
/// Same validation and semantics as [`list_available_slots_for_all`], but stops
/// at the first match instead of scanning the whole range.
pub fn find_first_available_slot_for_all(
    attendees: &[Attendee],
    range: &SlotRange,
) -> Result<Option<Slot>> {
    validate_attendees(attendees)?;
    let mut candidates = SlotGenerator::new(range, DEFAULT_GRANULARITY_MINUTES)?;

    let first = candidates.find(|slot| attendees.iter().all(|attendee| attendee.is_free(slot)));
    debug!(found = first.is_some(), "searched for first mutually available slot");
    Ok(first)
}
