//! WASM bindings for slot-engine.
//!
//! Exposes the slot check and the single- and multi-attendee slot listings to
//! JavaScript via `wasm-bindgen`. Complex types cross the boundary as JSON
//! strings; instants are ISO 8601 strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::{Attendee, Availability, Buffer, Event, Slot, SlotError, SlotRange};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotDto {
    start: String,
    #[serde(rename = "durationM")]
    duration_minutes: u32,
}

impl From<&Slot> for SlotDto {
    fn from(s: &Slot) -> Self {
        Self {
            start: s.start.to_rfc3339(),
            duration_minutes: s.duration_minutes,
        }
    }
}

/// Input format for events passed from JavaScript.
#[derive(Deserialize)]
struct EventInput {
    start: String,
    end: String,
    #[serde(default)]
    buffer: Option<Buffer>,
}

/// Input format for attendees passed from JavaScript.
#[derive(Deserialize)]
struct AttendeeInput {
    availability: Availability,
    #[serde(default)]
    events: Vec<EventInput>,
}

// ---------------------------------------------------------------------------
// Helpers: parsing and the JS-independent core of each export
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset, e.g. "2026-03-16T09:00:00+01:00") and naive
/// datetimes (e.g. "2026-03-16T09:00:00"), which are read as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

/// JS numbers arrive as `f64`; only whole, non-negative minutes that fit a
/// `u32` are accepted.
fn parse_duration_minutes(minutes: f64) -> Result<u32, String> {
    if !minutes.is_finite() || minutes < 0.0 || minutes.fract() != 0.0 || minutes > f64::from(u32::MAX)
    {
        return Err(SlotError::InvalidInput(format!(
            "slot duration {} is not a whole, non-negative number of minutes",
            minutes
        ))
        .to_string());
    }
    Ok(minutes as u32)
}

fn to_event(input: EventInput) -> Result<Event, String> {
    let event = Event {
        start: parse_datetime(&input.start)?,
        end: parse_datetime(&input.end)?,
        buffer: input.buffer,
    };
    event.validate().map_err(|e| e.to_string())?;
    Ok(event)
}

/// Convert a JSON array of `{start, end, buffer?}` objects into validated events.
fn parse_events_json(json: &str) -> Result<Vec<Event>, String> {
    let inputs: Vec<EventInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid events JSON: {}", e))?;
    inputs.into_iter().map(to_event).collect()
}

fn parse_availability_json(json: &str) -> Result<Availability, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid availability JSON: {}", e))
}

fn parse_attendees_json(json: &str) -> Result<Vec<Attendee>, String> {
    let inputs: Vec<AttendeeInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid attendees JSON: {}", e))?;
    inputs
        .into_iter()
        .map(|input| {
            let events = input
                .events
                .into_iter()
                .map(to_event)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Attendee::new(input.availability, events))
        })
        .collect()
}

fn parse_range(start: &str, end: &str) -> Result<SlotRange, String> {
    SlotRange::new(parse_datetime(start)?, parse_datetime(end)?).map_err(|e| e.to_string())
}

fn slots_to_json(slots: &[Slot]) -> Result<String, String> {
    let dtos: Vec<SlotDto> = slots.iter().map(SlotDto::from).collect();
    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

fn check_slot(
    availability_json: &str,
    events_json: &str,
    slot_start: &str,
    duration_minutes: f64,
) -> Result<bool, String> {
    let availability = parse_availability_json(availability_json)?;
    let events = parse_events_json(events_json)?;
    let slot = Slot::new(
        parse_datetime(slot_start)?,
        parse_duration_minutes(duration_minutes)?,
    )
    .map_err(|e| e.to_string())?;
    slot_engine::is_available(&availability, &events, &slot).map_err(|e| e.to_string())
}

fn list_for_one(
    availability_json: &str,
    events_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, String> {
    let availability = parse_availability_json(availability_json)?;
    let events = parse_events_json(events_json)?;
    let range = parse_range(range_start, range_end)?;
    let slots = slot_engine::list_available_slots(&availability, &events, &range)
        .map_err(|e| e.to_string())?;
    slots_to_json(&slots)
}

fn list_for_all(attendees_json: &str, range_start: &str, range_end: &str) -> Result<String, String> {
    let attendees = parse_attendees_json(attendees_json)?;
    let range = parse_range(range_start, range_end)?;
    let slots =
        slot_engine::list_available_slots_for_all(&attendees, &range).map_err(|e| e.to_string())?;
    slots_to_json(&slots)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Check whether one slot is bookable.
///
/// `availability_json` is `{timezone?, include: [{weekday, range}]}`;
/// `events_json` is an array of `{start, end, buffer?}` (pass `"[]"` to check
/// availability alone). `slot_start` is an ISO 8601 datetime string and
/// `duration_minutes` must be a positive whole number.
#[wasm_bindgen(js_name = "isAvailable")]
pub fn is_available(
    availability_json: &str,
    events_json: &str,
    slot_start: &str,
    duration_minutes: f64,
) -> Result<bool, JsValue> {
    check_slot(availability_json, events_json, slot_start, duration_minutes)
        .map_err(|e| JsValue::from_str(&e))
}

/// List every bookable 30-minute slot in `[range_start, range_end)` for one person.
///
/// Returns a JSON string containing an array of `{start, durationM}` objects.
#[wasm_bindgen(js_name = "listAvailableSlots")]
pub fn list_available_slots(
    availability_json: &str,
    events_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, JsValue> {
    list_for_one(availability_json, events_json, range_start, range_end)
        .map_err(|e| JsValue::from_str(&e))
}

/// List every 30-minute slot in `[range_start, range_end)` bookable for all attendees.
///
/// `attendees_json` is an array of `{availability, events?}` objects. Returns a
/// JSON string containing an array of `{start, durationM}` objects.
#[wasm_bindgen(js_name = "listAvailableSlotsForAll")]
pub fn list_available_slots_for_all(
    attendees_json: &str,
    range_start: &str,
    range_end: &str,
) -> Result<String, JsValue> {
    list_for_all(attendees_json, range_start, range_end).map_err(|e| JsValue::from_str(&e))
}
