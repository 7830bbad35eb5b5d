//! # slot-engine
//!
//! Decides whether a time slot can be booked against recurring weekly
//! availability and already-scheduled events, and enumerates bookable slots in
//! a range for one person or for a group that must all be free.
//!
//! Every function is pure: inputs are immutable values, nothing is persisted,
//! and there is no I/O. Instants are `DateTime<Utc>`; weekly windows are read
//! in the timezone their [`Availability`] declares.
//!
//! ## Modules
//!
//! - [`weekly`] — Weekly windows and the slot matcher
//! - [`conflict`] — Buffered event overlap detection
//! - [`slots`] — Slots, ranges, and the fixed-step generator
//! - [`availability`] — Single-person and multi-attendee queries
//! - [`error`] — Error types

pub mod availability;
pub mod conflict;
pub mod error;
pub mod slots;
pub mod weekly;

pub use availability::{
    find_first_available_slot_for_all, is_available, list_available_slots,
    list_available_slots_for_all, Attendee,
};
pub use conflict::{conflicts, first_conflict, Buffer, Event};
pub use error::SlotError;
pub use slots::{generate_slots, Slot, SlotGenerator, SlotRange, DEFAULT_GRANULARITY_MINUTES};
pub use weekly::{matches, Availability, TimeOfDay, WeeklyWindow};
