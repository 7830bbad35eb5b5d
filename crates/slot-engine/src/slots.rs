//! Candidate slots and the fixed-step slot generator.
//!
//! A [`SlotRange`] is half-open: slots are emitted while their start is before
//! `range.end`. The last slot may run past `range.end`; availability and
//! conflict checks reject it downstream when it does not fit.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Step and slot length used by the enumeration functions.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

/// A candidate (or confirmed) bookable interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    #[serde(rename = "durationM")]
    pub duration_minutes: u32,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, duration_minutes: u32) -> Result<Self> {
        let slot = Self {
            start,
            duration_minutes,
        };
        slot.validate()?;
        Ok(slot)
    }

    /// Derived end: `start + duration_minutes`, or `None` when it falls past
    /// the last representable instant.
    pub fn checked_end(&self) -> Option<DateTime<Utc>> {
        self.start
            .checked_add_signed(Duration::minutes(i64::from(self.duration_minutes)))
    }

    /// Derived end: `start + duration_minutes`, clamped to `DateTime::<Utc>::MAX_UTC`.
    ///
    /// Validated slots never hit the clamp.
    pub fn end(&self) -> DateTime<Utc> {
        self.checked_end().unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Reject zero-length slots and slots whose end is not representable.
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidInput(
                "slot duration must be a positive number of minutes".to_string(),
            ));
        }
        if self.checked_end().is_none() {
            return Err(SlotError::InvalidInput(format!(
                "slot starting {} with {} minutes ends past the representable range",
                self.start.to_rfc3339(),
                self.duration_minutes
            )));
        }
        Ok(())
    }
}

/// Half-open range `[start, end)` to enumerate slots over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SlotRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// Reject ranges whose start is after their end. An empty range is valid.
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(SlotError::InvalidInput(format!(
                "range start {} is after its end {}",
                self.start.to_rfc3339(),
                self.end.to_rfc3339()
            )));
        }
        Ok(())
    }
}

/// Iterator over fixed-length slots stepping through a [`SlotRange`].
///
/// Cloning the generator restarts from the clone point; building a new one from
/// the same range and granularity yields the same sequence. Slots whose end
/// would fall past `DateTime::<Utc>::MAX_UTC` are never emitted.
#[derive(Debug, Clone)]
pub struct SlotGenerator {
    next: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    granularity_minutes: u32,
}

impl SlotGenerator {
    /// # Errors
    /// Returns `SlotError::InvalidInput` for a zero granularity or a reversed range.
    pub fn new(range: &SlotRange, granularity_minutes: u32) -> Result<Self> {
        if granularity_minutes == 0 {
            return Err(SlotError::InvalidInput(
                "granularity must be a positive number of minutes".to_string(),
            ));
        }
        range.validate()?;
        Ok(Self {
            next: Some(range.start),
            end: range.end,
            granularity_minutes,
        })
    }
}

impl Iterator for SlotGenerator {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        let start = self.next.filter(|start| *start < self.end)?;
        let slot = Slot {
            start,
            duration_minutes: self.granularity_minutes,
        };
        // A slot whose end is not representable ends the sequence.
        let end = slot.checked_end();
        self.next = end;
        end.map(|_| slot)
    }
}

/// All slots of `granularity_minutes` starting in `range`, in chronological order.
pub fn generate_slots(range: &SlotRange, granularity_minutes: u32) -> Result<Vec<Slot>> {
    Ok(SlotGenerator::new(range, granularity_minutes)?.collect())
}
