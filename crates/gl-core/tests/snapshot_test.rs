use chrono::{DateTime, Duration, NaiveDate, Utc};

use gl_core::grouping::{filter_by_search, group_by_status, SearchField};
use gl_core::snapshot::GrowSnapshot;
use gl_core::timeline::compute_timeline_layout;
use gl_core::types::{GrowRecord, GrowStatus, TimelineItem};
use gl_core::CoreError;

fn date(s: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

fn item(id: &str, status: GrowStatus) -> TimelineItem {
    TimelineItem::new(id, "Romaine", date("2024-01-01"), date("2024-01-31"), status)
}

#[test]
fn snapshot_keeps_items_in_order() {
    let snap = GrowSnapshot::new(vec![
        item("a", GrowStatus::Active),
        item("b", GrowStatus::Planned),
        item("c", GrowStatus::Active),
    ])
    .unwrap();

    assert_eq!(snap.len(), 3);
    assert!(!snap.is_empty());
    let ids: Vec<&str> = snap.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(snap.count_with_status(GrowStatus::Active), 2);
    assert_eq!(snap.get("b").unwrap().status, GrowStatus::Planned);
    assert!(snap.get("zzz").is_none());
}

#[test]
fn snapshot_rejects_duplicate_ids() {
    let err = GrowSnapshot::new(vec![
        item("dup", GrowStatus::Active),
        item("dup", GrowStatus::Completed),
    ])
    .unwrap_err();
    assert_eq!(err, CoreError::DuplicateId("dup".into()));
}

#[test]
fn snapshot_rejects_reversed_interval() {
    let mut bad = item("bad", GrowStatus::Active);
    bad.end_date = bad.start_date - Duration::days(1);
    let err = GrowSnapshot::new(vec![bad]).unwrap_err();
    assert_eq!(err, CoreError::InvalidInterval { id: "bad".into() });
}

#[test]
fn snapshot_rejects_progress_over_hundred() {
    let bad = item("p", GrowStatus::Active).with_progress(101);
    assert!(matches!(
        GrowSnapshot::new(vec![bad]),
        Err(CoreError::ProgressOutOfRange { progress: 101, .. })
    ));
}

#[test]
fn snapshot_from_records_fails_fast() {
    let records = vec![
        GrowRecord::from(&item("ok", GrowStatus::Active)),
        GrowRecord {
            start_date: "not a date".into(),
            ..GrowRecord::from(&item("broken", GrowStatus::Active))
        },
    ];
    let err = GrowSnapshot::from_records(records).unwrap_err();
    assert!(matches!(err, CoreError::InvalidDate { ref id, .. } if id == "broken"));
}

#[test]
fn empty_snapshot_feeds_the_calculator() {
    let snap = GrowSnapshot::empty();
    assert!(snap.is_empty());

    let layout = compute_timeline_layout(snap.items(), 1.0, date("2024-05-01"), 90);
    assert!(layout.positions.is_empty());
    assert!(group_by_status(snap.items()).is_empty());
}

#[test]
fn refresh_replaces_the_whole_snapshot() {
    let first = GrowSnapshot::new(vec![item("a", GrowStatus::Active)]).unwrap();
    let held = first.clone();

    let second = GrowSnapshot::new(vec![
        item("b", GrowStatus::Planned),
        item("c", GrowStatus::Planned),
    ])
    .unwrap();

    // The old snapshot (and anything borrowed from it) is untouched.
    assert_eq!(held.len(), 1);
    assert_eq!(held.items()[0].id, "a");
    assert_eq!(second.len(), 2);
    assert!(second.get("a").is_none());
}

#[test]
fn explicit_timestamp_and_record_roundtrip() {
    let taken = date("2024-02-02");
    let snap = GrowSnapshot::with_timestamp(vec![item("a", GrowStatus::Completed)], taken).unwrap();
    assert_eq!(snap.taken_at(), taken);

    let rebuilt = GrowSnapshot::from_records(snap.to_records()).unwrap();
    assert_eq!(rebuilt.items(), snap.items());
}

#[test]
fn pipeline_over_snapshot() {
    let snap = GrowSnapshot::new(vec![
        item("a", GrowStatus::Active),
        TimelineItem::new("b", "Basil", date("2024-01-10"), date("2024-02-10"), GrowStatus::Active),
    ])
    .unwrap();

    let hits = filter_by_search(snap.items(), "romaine", &SearchField::DEFAULT);
    let layout = compute_timeline_layout(hits, 1.0, date("2024-01-15"), 90);
    assert_eq!(layout.positions.len(), 1);
    assert!(layout.position("a").is_some());
}
