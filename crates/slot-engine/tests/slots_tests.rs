//! Tests for the fixed-step slot generator.

use chrono::{DateTime, Duration, TimeZone, Utc};
use slot_engine::slots::{generate_slots, Slot, SlotGenerator, SlotRange};
use slot_engine::SlotError;

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> SlotRange {
    SlotRange { start, end }
}

#[test]
fn ninety_minutes_yields_three_slots() {
    let t = at(9, 0);
    let slots = generate_slots(&range(t, t + Duration::minutes(90)), 30).unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![t, t + Duration::minutes(30), t + Duration::minutes(60)]
    );
    assert!(slots.iter().all(|s| s.duration_minutes == 30));
}

#[test]
fn range_end_is_exclusive() {
    // [08:00, 10:00) → 08:00, 08:30, 09:00, 09:30; nothing at 10:00.
    let slots = generate_slots(&range(at(8, 0), at(10, 0)), 30).unwrap();
    let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at(8, 0), at(8, 30), at(9, 0), at(9, 30)]);
}

#[test]
fn last_slot_may_run_past_range_end() {
    let slots = generate_slots(&range(at(8, 0), at(8, 45)), 30).unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].start, at(8, 30));
    assert_eq!(slots[1].end(), at(9, 0));
}

#[test]
fn empty_range_yields_nothing() {
    let slots = generate_slots(&range(at(9, 0), at(9, 0)), 30).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn reversed_range_is_rejected() {
    let err = generate_slots(&range(at(10, 0), at(9, 0)), 30).unwrap_err();
    assert!(matches!(err, SlotError::InvalidInput(_)));
    assert!(SlotRange::new(at(10, 0), at(9, 0)).is_err());
}

#[test]
fn zero_granularity_is_rejected() {
    let err = generate_slots(&range(at(9, 0), at(10, 0)), 0).unwrap_err();
    assert!(matches!(err, SlotError::InvalidInput(_)));
}

#[test]
fn generator_is_restartable() {
    let r = range(at(0, 0), at(23, 59));
    let generator = SlotGenerator::new(&r, 15).unwrap();

    let first: Vec<Slot> = generator.clone().collect();
    let second: Vec<Slot> = generator.collect();
    let fresh = generate_slots(&r, 15).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, fresh);
    assert_eq!(first.len(), 96);
}

#[test]
fn starts_are_strictly_increasing() {
    let slots = generate_slots(&range(at(0, 0), at(0, 0) + Duration::days(7)), 30).unwrap();
    assert_eq!(slots.len(), 7 * 48);
    for pair in slots.windows(2) {
        assert!(pair[0].start < pair[1].start);
    }
}

#[test]
fn slot_end_is_derived_from_duration() {
    let slot = Slot::new(at(9, 0), 45).unwrap();
    assert_eq!(slot.end(), at(9, 45));
}

#[test]
fn slot_ending_past_representable_range_is_rejected() {
    let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(10);

    let err = Slot::new(start, 30).unwrap_err();
    assert!(matches!(err, SlotError::InvalidInput(_)));

    let unchecked = Slot {
        start,
        duration_minutes: 30,
    };
    assert_eq!(unchecked.checked_end(), None);
    assert_eq!(unchecked.end(), DateTime::<Utc>::MAX_UTC);
    assert!(Slot::new(start, 10).is_ok());
}

#[test]
fn generator_stops_before_unrepresentable_end() {
    let max = DateTime::<Utc>::MAX_UTC;
    let slots = generate_slots(&range(max - Duration::minutes(10), max), 30).unwrap();
    assert!(slots.is_empty());

    // The slot ending exactly on the last instant is still emitted.
    let slots = generate_slots(&range(max - Duration::minutes(60), max), 30).unwrap();
    let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![max - Duration::minutes(60), max - Duration::minutes(30)]
    );
}

#[test]
fn zero_duration_slot_is_rejected() {
    assert!(matches!(
        Slot::new(at(9, 0), 0),
        Err(SlotError::InvalidInput(_))
    ));
}

#[test]
fn slot_serializes_duration_as_duration_m() {
    let slot = Slot::new(at(9, 0), 30).unwrap();
    let json = serde_json::to_string(&slot).unwrap();
    assert_eq!(json, r#"{"start":"2026-03-16T09:00:00Z","durationM":30}"#);
}
