//! Tests for buffered event conflict detection.

use chrono::{DateTime, Duration, TimeZone, Utc};
use slot_engine::conflict::{conflicts, first_conflict, overlaps, plain_overlaps, Buffer, Event};
use slot_engine::Slot;

/// Helper to create an event on 2026-03-17 (a Tuesday) from hour/minute pairs.
fn event(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Event {
    Event::new(
        Utc.with_ymd_and_hms(2026, 3, 17, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2026, 3, 17, end_hour, end_min, 0).unwrap(),
    )
}

fn slot(hour: u32, min: u32, duration_minutes: u32) -> Slot {
    Slot {
        start: Utc.with_ymd_and_hms(2026, 3, 17, hour, min, 0).unwrap(),
        duration_minutes,
    }
}

#[test]
fn before_buffer_blocks_slot_ending_inside_it() {
    // Event 10:00-10:30 with 15 min before → blocked from 09:45.
    // Slot 09:50-10:20 overlaps.
    let events = vec![event(10, 0, 10, 30).with_buffer(15, 0)];
    assert!(conflicts(&events, &slot(9, 50, 30)));
}

#[test]
fn before_buffer_is_in_minutes() {
    // A 1-minute before-buffer extends the event to 09:59, not 09:30.
    let events = vec![event(10, 0, 10, 30).with_buffer(1, 0)];
    assert!(!conflicts(&events, &slot(9, 0, 30)));
    assert!(!conflicts(&events, &slot(9, 29, 30)));
    assert!(conflicts(&events, &slot(9, 30, 30)));
}

#[test]
fn after_buffer_blocks_slot_starting_inside_it() {
    // Event 10:00-10:30 with 20 min after → blocked until 10:50.
    let events = vec![event(10, 0, 10, 30).with_buffer(0, 20)];
    assert!(conflicts(&events, &slot(10, 30, 30)));
    assert!(!conflicts(&events, &slot(10, 50, 30)));
}

#[test]
fn slot_adjacent_to_event_does_not_conflict() {
    let events = vec![event(10, 0, 10, 30)];
    assert!(!conflicts(&events, &slot(9, 30, 30)), "slot ends at event start");
    assert!(!conflicts(&events, &slot(10, 30, 30)), "slot starts at event end");
}

#[test]
fn slot_adjacent_to_buffered_edge_does_not_conflict() {
    let events = vec![event(10, 0, 10, 30).with_buffer(30, 30)];
    assert!(!conflicts(&events, &slot(9, 0, 30)), "ends at buffered start");
    assert!(!conflicts(&events, &slot(11, 0, 30)), "starts at buffered end");
}

#[test]
fn slot_covering_event_conflicts() {
    let events = vec![event(10, 0, 10, 15)];
    assert!(conflicts(&events, &slot(9, 30, 90)));
}

#[test]
fn slot_inside_event_conflicts() {
    let events = vec![event(9, 0, 12, 0)];
    assert!(conflicts(&events, &slot(10, 0, 30)));
}

#[test]
fn missing_buffer_fields_default_to_zero() {
    let only_after = Event {
        buffer: Some(Buffer {
            before: 0,
            after: 10,
        }),
        ..event(10, 0, 10, 30)
    };
    assert_eq!(only_after.buffered_start(), only_after.start);

    let parsed: Event = serde_json::from_str(
        r#"{"start":"2026-03-17T10:00:00Z","end":"2026-03-17T10:30:00Z","buffer":{"after":10}}"#,
    )
    .unwrap();
    assert_eq!(parsed, only_after);
}

#[test]
fn no_events_no_conflict() {
    assert!(!conflicts(&[], &slot(10, 0, 30)));
}

#[test]
fn first_conflict_returns_earliest_listed_blocker() {
    let events = vec![
        event(8, 0, 8, 30),
        event(10, 15, 10, 45),
        event(10, 0, 11, 0),
    ];
    let blocker = first_conflict(&events, &slot(10, 0, 30)).unwrap();
    assert_eq!(blocker, &events[1]);
    assert!(first_conflict(&events, &slot(12, 0, 30)).is_none());
}

#[test]
fn plain_reference_agrees_for_unbuffered_events() {
    let e = event(10, 0, 11, 0);
    for (hour, min) in [(9, 0), (9, 30), (9, 45), (10, 0), (10, 30), (10, 45), (11, 0)] {
        let s = slot(hour, min, 30);
        assert_eq!(overlaps(&e, &s), plain_overlaps(&e, &s), "at {hour}:{min}");
    }
}

#[test]
fn plain_reference_ignores_buffer() {
    let e = event(10, 0, 10, 30).with_buffer(15, 0);
    let s = slot(9, 30, 30);
    assert!(overlaps(&e, &s));
    assert!(!plain_overlaps(&e, &s));
}

#[test]
fn event_validation_rejects_non_positive_length() {
    assert!(event(10, 0, 10, 30).validate().is_ok());
    assert!(event(10, 0, 10, 0).validate().is_err());
    assert!(event(10, 30, 10, 0).validate().is_err());
}

#[test]
fn before_buffer_clamps_at_earliest_instant() {
    let min = DateTime::<Utc>::MIN_UTC;
    let early = Event::new(min + Duration::minutes(5), min + Duration::minutes(15)).with_buffer(60, 0);
    assert_eq!(early.buffered_start(), min);

    let first = Slot {
        start: min,
        duration_minutes: 30,
    };
    assert!(conflicts(&[early], &first));
}

#[test]
fn after_buffer_clamps_at_latest_instant() {
    let max = DateTime::<Utc>::MAX_UTC;
    let late = Event::new(max - Duration::minutes(20), max - Duration::minutes(10)).with_buffer(0, 60);
    assert_eq!(late.buffered_end(), max);

    let last = Slot {
        start: max - Duration::minutes(5),
        duration_minutes: 5,
    };
    assert!(conflicts(&[late], &last));
}

#[test]
fn buffer_minutes_must_be_whole_and_non_negative() {
    let fractional = r#"{"start":"2026-03-17T10:00:00Z","end":"2026-03-17T10:30:00Z","buffer":{"before":7.5}}"#;
    let negative = r#"{"start":"2026-03-17T10:00:00Z","end":"2026-03-17T10:30:00Z","buffer":{"after":-5}}"#;

    assert!(serde_json::from_str::<Event>(fractional).is_err());
    assert!(serde_json::from_str::<Event>(negative).is_err());
}
