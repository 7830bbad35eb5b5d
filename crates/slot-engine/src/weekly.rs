//! Weekly recurring availability windows and the slot matcher.
//!
//! An [`Availability`] is a list of [`WeeklyWindow`]s interpreted in one declared
//! IANA timezone. A slot matches when its start and end, both converted into
//! that zone, fall inside at least one window for the slot's weekday. Windows
//! are never merged: a slot straddling two adjacent windows does not match.

use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::slots::Slot;

/// A wall-clock point within a day, independent of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
}

impl TimeOfDay {
    /// Build a time of day, rejecting hours outside 0-23 and minutes outside 0-59.
    pub fn new(hours: u8, minutes: u8) -> Result<Self> {
        let time = Self { hours, minutes };
        time.validate()?;
        Ok(time)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hours > 23 || self.minutes > 59 {
            return Err(SlotError::InvalidInput(format!(
                "time of day {:02}:{:02} is out of range",
                self.hours, self.minutes
            )));
        }
        Ok(())
    }

    /// The equivalent `NaiveTime`, or `None` when the fields are out of range.
    pub(crate) fn to_naive_time(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hours), u32::from(self.minutes), 0)
    }
}

/// One contiguous availability interval on one weekday.
///
/// `weekday` counts from Sunday (0) to Saturday (6). `range` is `[start, end]`,
/// both inclusive, within a single day. A window whose start is after its end
/// is accepted but never matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeeklyWindow {
    pub weekday: u8,
    pub range: [TimeOfDay; 2],
}

impl WeeklyWindow {
    pub fn new(weekday: u8, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        let window = Self {
            weekday,
            range: [start, end],
        };
        window.validate()?;
        Ok(window)
    }

    pub fn start(&self) -> TimeOfDay {
        self.range[0]
    }

    pub fn end(&self) -> TimeOfDay {
        self.range[1]
    }

    pub fn validate(&self) -> Result<()> {
        if self.weekday > 6 {
            return Err(SlotError::InvalidInput(format!(
                "weekday {} is out of range (0 = Sunday .. 6 = Saturday)",
                self.weekday
            )));
        }
        self.start().validate()?;
        self.end().validate()
    }

    /// Whether the local interval `[start, end]` lies inside this window.
    ///
    /// Both bounds are inclusive. Callers pass wall-clock times already on the
    /// window's weekday.
    fn contains(&self, start: NaiveTime, end: NaiveTime) -> bool {
        match (self.start().to_naive_time(), self.end().to_naive_time()) {
            (Some(window_start), Some(window_end)) => start >= window_start && end <= window_end,
            _ => false,
        }
    }
}

fn default_timezone() -> Tz {
    chrono_tz::UTC
}

/// A person's recurring weekly availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    /// Zone in which every window is interpreted. Defaults to UTC.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
    /// Windows in caller order. A weekday may appear any number of times.
    pub include: Vec<WeeklyWindow>,
}

impl Availability {
    /// Availability whose windows are interpreted in UTC.
    pub fn utc(include: Vec<WeeklyWindow>) -> Self {
        Self {
            timezone: default_timezone(),
            include,
        }
    }

    /// Availability in the named IANA zone (e.g. "Europe/Lisbon").
    ///
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if the name is not a known zone.
    pub fn in_timezone(timezone: &str, include: Vec<WeeklyWindow>) -> Result<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self {
            timezone: tz,
            include,
        })
    }

    /// Reject out-of-domain weekdays and times of day.
    pub fn validate(&self) -> Result<()> {
        self.include.iter().try_for_each(WeeklyWindow::validate)
    }

    /// Windows declared for `weekday` (0 = Sunday).
    pub fn windows_for(&self, weekday: u8) -> impl Iterator<Item = &WeeklyWindow> {
        self.include.iter().filter(move |w| w.weekday == weekday)
    }

    /// Wall-clock time of `instant` in the declared zone, or `None` when the
    /// offset pushes it outside the representable range.
    fn local(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        let utc = instant.naive_utc();
        let offset = self.timezone.offset_from_utc_datetime(&utc).fix();
        utc.checked_add_offset(offset)
    }
}

/// Whether `slot` lies fully inside one of the availability's windows.
///
/// The slot's weekday comes from its start. A slot whose local end falls on a
/// later day than its start never matches, since windows do not span midnight.
/// Neither does a slot whose end or local time is not representable.
pub fn matches(availability: &Availability, slot: &Slot) -> bool {
    let Some(slot_end) = slot.checked_end() else {
        return false;
    };
    let (Some(start), Some(end)) = (availability.local(slot.start), availability.local(slot_end))
    else {
        return false;
    };

    if end.date() != start.date() {
        return false;
    }

    let weekday = start.weekday().num_days_from_sunday() as u8;
    availability
        .windows_for(weekday)
        .any(|window| window.contains(start.time(), end.time()))
}
