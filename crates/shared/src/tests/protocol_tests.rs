use chrono::{TimeZone, Utc};

use super::*;
use crate::domain::Event;

fn concert() -> Event {
    let mut event = Event::new("e1", "Jazz Night");
    event.description = Some("Live quartet in the park".to_string());
    event.location = Some("Minneapolis".to_string());
    event.category = Some("Music".to_string());
    event.starts_at = Some(Utc.with_ymd_and_hms(2026, 6, 1, 19, 0, 0).unwrap());
    event
}

#[test]
fn empty_filters_match_everything() {
    let filters = EventFilters::default();
    assert!(filters.is_empty());
    assert!(filters.matches(&concert()));
    assert!(filters.matches(&Event::new("e2", "Untitled")));
}

#[test]
fn blank_strings_count_as_unset() {
    let filters = EventFilters {
        category: Some("  ".to_string()),
        search: Some(String::new()),
        ..EventFilters::default()
    };
    assert!(filters.is_empty());
    assert!(filters.query_pairs().is_empty());
}

#[test]
fn category_matches_case_insensitively() {
    assert!(EventFilters::by_category("music").matches(&concert()));
    assert!(!EventFilters::by_category("sports").matches(&concert()));
    assert!(!EventFilters::by_category("music").matches(&Event::new("e2", "No category")));
}

#[test]
fn search_looks_at_title_and_description() {
    let by_title = EventFilters {
        search: Some("jazz".to_string()),
        ..EventFilters::default()
    };
    let by_description = EventFilters {
        search: Some("QUARTET".to_string()),
        ..EventFilters::default()
    };
    let miss = EventFilters {
        search: Some("opera".to_string()),
        ..EventFilters::default()
    };
    assert!(by_title.matches(&concert()));
    assert!(by_description.matches(&concert()));
    assert!(!miss.matches(&concert()));
}

#[test]
fn date_window_excludes_undated_and_out_of_range_events() {
    let window = EventFilters {
        from: Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()),
        to: Some(Utc.with_ymd_and_hms(2026, 5, 31, 23, 59, 59).unwrap()),
        ..EventFilters::default()
    };
    assert!(!window.matches(&concert()));
    assert!(!window.matches(&Event::new("e2", "Undated")));

    let open_ended = EventFilters {
        from: Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap()),
        ..EventFilters::default()
    };
    assert!(open_ended.matches(&concert()));
}

#[test]
fn query_pairs_keep_a_stable_order() {
    let filters = EventFilters {
        category: Some("Music".to_string()),
        search: Some("jazz".to_string()),
        location: Some("Minneapolis".to_string()),
        ..EventFilters::default()
    };
    assert_eq!(
        filters.query_pairs(),
        vec![
            ("category", "Music".to_string()),
            ("search", "jazz".to_string()),
            ("location", "Minneapolis".to_string()),
        ]
    );
}

#[test]
fn patch_only_touches_provided_fields() {
    let mut event = concert();
    let patch = EventPatch {
        title: Some("Jazz & Blues Night".to_string()),
        max_attendees: Some(40),
        ..EventPatch::default()
    };
    patch.apply_to(&mut event);

    assert_eq!(event.title, "Jazz & Blues Night");
    assert_eq!(event.max_attendees, Some(40));
    assert_eq!(event.location.as_deref(), Some("Minneapolis"));
    assert_eq!(event.category.as_deref(), Some("Music"));
    assert!(EventPatch::default().is_empty());
    assert!(!patch.is_empty());
}

#[test]
fn event_payload_deserializes_with_missing_optional_fields() {
    let event: Event = serde_json::from_str(r#"{"id":"42","title":"Meetup"}"#).expect("event");
    assert_eq!(event.id.as_str(), "42");
    assert!(event.attendees.is_empty());
    assert!(event.starts_at.is_none());
}
