//! Detect slots that overlap already-scheduled events.
//!
//! Each event may carry a [`Buffer`] that widens it: `before` minutes are
//! subtracted from its start and `after` minutes are added to its end. A slot
//! conflicts with an event when the two half-open intervals intersect.
//! Adjacent intervals (one ends exactly when the other starts) do NOT conflict.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::slots::Slot;

/// Padding around an event, in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Buffer {
    #[serde(default)]
    pub before: u32,
    #[serde(default)]
    pub after: u32,
}

/// An already-scheduled event.
///
/// `start < end` is a precondition of the detector. It is not checked there;
/// boundaries that accept events from outside call [`Event::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer: Option<Buffer>,
}

impl Event {
    /// An event without buffer.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            buffer: None,
        }
    }

    pub fn with_buffer(mut self, before: u32, after: u32) -> Self {
        self.buffer = Some(Buffer { before, after });
        self
    }

    /// Reject events whose start is not strictly before their end.
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(SlotError::InvalidInput(format!(
                "event start {} is not before its end {}",
                self.start.to_rfc3339(),
                self.end.to_rfc3339()
            )));
        }
        Ok(())
    }

    /// Start of the event after subtracting `buffer.before`, clamped to
    /// `DateTime::<Utc>::MIN_UTC`.
    pub fn buffered_start(&self) -> DateTime<Utc> {
        let before = self.buffer.map_or(0, |b| b.before);
        self.start
            .checked_sub_signed(Duration::minutes(i64::from(before)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// End of the event after adding `buffer.after`, clamped to
    /// `DateTime::<Utc>::MAX_UTC`.
    pub fn buffered_end(&self) -> DateTime<Utc> {
        let after = self.buffer.map_or(0, |b| b.after);
        self.end
            .checked_add_signed(Duration::minutes(i64::from(after)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Whether `slot` overlaps `event` once the event is widened by its buffer.
///
/// Overlap holds iff `slot.start < buffered_end && slot.end > buffered_start`.
pub fn overlaps(event: &Event, slot: &Slot) -> bool {
    slot.start < event.buffered_end() && slot.end() > event.buffered_start()
}

/// Buffer-free overlap as three cases: the slot starts inside the event, ends
/// inside it, or covers it entirely.
///
/// Ignores `event.buffer`. For events without buffer it agrees exactly with
/// [`overlaps`] and is kept as a cross-check reference.
pub fn plain_overlaps(event: &Event, slot: &Slot) -> bool {
    let (slot_start, slot_end) = (slot.start, slot.end());
    (slot_start >= event.start && slot_start < event.end)
        || (slot_end > event.start && slot_end <= event.end)
        || (slot_start <= event.start && slot_end >= event.end)
}

/// The first event (in list order) that blocks `slot`, if any.
pub fn first_conflict<'a>(events: &'a [Event], slot: &Slot) -> Option<&'a Event> {
    events.iter().find(|event| overlaps(event, slot))
}

/// Whether `slot` overlaps at least one buffered event.
pub fn conflicts(events: &[Event], slot: &Slot) -> bool {
    first_conflict(events, slot).is_some()
}
