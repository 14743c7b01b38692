use chrono::{DateTime, NaiveDate, Utc};

use gl_core::types::{GrowRecord, GrowStatus, Location, TimelineItem};
use gl_core::CoreError;

fn date(s: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

fn record(id: &str, start: &str, end: &str) -> GrowRecord {
    GrowRecord {
        id: id.into(),
        species_name: "Genovese Basil".into(),
        variety: Some("Large Leaf".into()),
        start_date: start.into(),
        end_date: end.into(),
        status: "active".into(),
        progress: 40,
        farm_name: "North Farm".into(),
        row_name: "Row 3".into(),
        rack_name: "Rack B".into(),
        shelf_name: "Shelf 2".into(),
    }
}

#[test]
fn grow_status_parses_and_displays() {
    assert_eq!("planned".parse::<GrowStatus>().unwrap(), GrowStatus::Planned);
    assert_eq!(" Active ".parse::<GrowStatus>().unwrap(), GrowStatus::Active);
    assert_eq!("COMPLETED".parse::<GrowStatus>().unwrap(), GrowStatus::Completed);
    assert_eq!(GrowStatus::Aborted.to_string(), "aborted");
    assert_eq!(
        "harvested".parse::<GrowStatus>().unwrap_err(),
        CoreError::UnknownStatus("harvested".into())
    );
}

#[test]
fn grow_status_lane_order() {
    assert!(GrowStatus::Planned < GrowStatus::Active);
    assert!(GrowStatus::Active < GrowStatus::Completed);
    assert!(GrowStatus::Completed < GrowStatus::Aborted);
    assert_eq!(GrowStatus::ALL.len(), 4);
}

#[test]
fn grow_status_glyph() {
    assert_eq!(GrowStatus::Planned.glyph(), "o");
    assert_eq!(GrowStatus::Active.glyph(), "@");
    assert_eq!(GrowStatus::Completed.glyph(), "+");
    assert_eq!(GrowStatus::Aborted.glyph(), "x");
}

#[test]
fn record_converts_to_item() {
    let item = TimelineItem::try_from(record("g1", "2024-01-15", "2024-02-19T12:00:00Z")).unwrap();
    assert_eq!(item.id, "g1");
    assert_eq!(item.start_date, date("2024-01-15"));
    assert_eq!(item.end_date.to_rfc3339(), "2024-02-19T12:00:00+00:00");
    assert_eq!(item.status, GrowStatus::Active);
    assert_eq!(item.progress, 40);
    assert_eq!(item.variety.as_deref(), Some("Large Leaf"));
    assert_eq!(
        item.location,
        Location::new("North Farm", "Row 3", "Rack B", "Shelf 2")
    );
    assert_eq!(item.duration_days(), 35);
}

#[test]
fn record_with_bad_date_is_rejected() {
    let err = TimelineItem::try_from(record("g1", "15/01/2024", "2024-02-19")).unwrap_err();
    assert!(matches!(err, CoreError::InvalidDate { field: "startDate", .. }));
    assert!(err.to_string().contains("15/01/2024"));
}

#[test]
fn record_with_reversed_dates_is_rejected() {
    let err = TimelineItem::try_from(record("g9", "2024-03-01", "2024-02-01")).unwrap_err();
    assert_eq!(err, CoreError::InvalidInterval { id: "g9".into() });
}

#[test]
fn record_with_excess_progress_is_rejected() {
    let mut rec = record("g2", "2024-01-01", "2024-02-01");
    rec.progress = 140;
    let err = TimelineItem::try_from(rec).unwrap_err();
    assert_eq!(
        err,
        CoreError::ProgressOutOfRange {
            id: "g2".into(),
            progress: 140
        }
    );
}

#[test]
fn record_with_unknown_status_is_rejected() {
    let mut rec = record("g3", "2024-01-01", "2024-02-01");
    rec.status = "sprouting".into();
    assert!(matches!(
        TimelineItem::try_from(rec),
        Err(CoreError::UnknownStatus(_))
    ));
}

#[test]
fn blank_variety_becomes_none() {
    let mut rec = record("g4", "2024-01-01", "2024-02-01");
    rec.variety = Some("  ".into());
    let item = TimelineItem::try_from(rec).unwrap();
    assert!(item.variety.is_none());
}

#[test]
fn record_json_uses_camel_case() {
    let json = r#"{
        "id": "g7",
        "speciesName": "Pea Shoots",
        "startDate": "2024-04-01",
        "endDate": "2024-04-14",
        "status": "planned",
        "farmName": "South Farm",
        "rowName": "Row 1",
        "rackName": "Rack A",
        "shelfName": "Shelf 4"
    }"#;
    let rec: GrowRecord = serde_json::from_str(json).expect("deserialize record");
    assert_eq!(rec.species_name, "Pea Shoots");
    assert_eq!(rec.progress, 0);
    assert!(rec.variety.is_none());

    let item = TimelineItem::try_from(rec).unwrap();
    assert_eq!(item.status, GrowStatus::Planned);
    assert_eq!(item.location.shelf_name, "Shelf 4");
}

#[test]
fn item_converts_back_to_record() {
    let item = TimelineItem::new(
        "g8",
        "Kale",
        date("2024-01-01"),
        date("2024-01-21"),
        GrowStatus::Completed,
    )
    .with_progress(100)
    .with_location(Location::new("F", "R", "K", "S"));

    let rec = GrowRecord::from(&item);
    assert_eq!(rec.status, "completed");
    assert_eq!(rec.farm_name, "F");

    let back = TimelineItem::try_from(rec).unwrap();
    assert_eq!(back, item);
}

#[test]
fn item_serialization_uses_snake_case_status() {
    let item = TimelineItem::new("g1", "Kale", date("2024-01-01"), date("2024-01-02"), GrowStatus::Active);
    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["status"], "active");
    assert_eq!(json["location"]["farm_name"], "");
}
