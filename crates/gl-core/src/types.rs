use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

// ---------------------------------------------------------------------------
// GrowStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a grow. Declaration order is the display order used by
/// the status lanes (planned → active → completed → aborted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowStatus {
    Planned,
    Active,
    Completed,
    Aborted,
}

impl GrowStatus {
    pub const ALL: [GrowStatus; 4] = [
        GrowStatus::Planned,
        GrowStatus::Active,
        GrowStatus::Completed,
        GrowStatus::Aborted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowStatus::Planned => "planned",
            GrowStatus::Active => "active",
            GrowStatus::Completed => "completed",
            GrowStatus::Aborted => "aborted",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            GrowStatus::Planned => "o",
            GrowStatus::Active => "@",
            GrowStatus::Completed => "+",
            GrowStatus::Aborted => "x",
        }
    }
}

impl fmt::Display for GrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrowStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planned" => Ok(GrowStatus::Planned),
            "active" => Ok(GrowStatus::Active),
            "completed" => Ok(GrowStatus::Completed),
            "aborted" => Ok(GrowStatus::Aborted),
            _ => Err(CoreError::UnknownStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Where a grow sits in the farm. Plain labels: nothing checks that the farm,
/// row, rack or shelf actually exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub farm_name: String,
    pub row_name: String,
    pub rack_name: String,
    pub shelf_name: String,
}

impl Location {
    pub fn new(
        farm: impl Into<String>,
        row: impl Into<String>,
        rack: impl Into<String>,
        shelf: impl Into<String>,
    ) -> Self {
        Self {
            farm_name: farm.into(),
            row_name: row.into(),
            rack_name: rack.into(),
            shelf_name: shelf.into(),
        }
    }

    /// `Farm / Row / Rack / Shelf`, skipping blank levels.
    pub fn path(&self) -> String {
        [
            self.farm_name.as_str(),
            self.row_name.as_str(),
            self.rack_name.as_str(),
            self.shelf_name.as_str(),
        ]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" / ")
    }
}

// ---------------------------------------------------------------------------
// TimelineItem
// ---------------------------------------------------------------------------

/// One grow cycle as drawn on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: String,
    pub species_name: String,
    pub variety: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: GrowStatus,
    /// Reported progress, 0..=100. Not derived from the dates.
    pub progress: u8,
    pub location: Location,
}

impl TimelineItem {
    pub fn new(
        id: impl Into<String>,
        species_name: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        status: GrowStatus,
    ) -> Self {
        Self {
            id: id.into(),
            species_name: species_name.into(),
            variety: None,
            start_date,
            end_date,
            status,
            progress: 0,
            location: Location::default(),
        }
    }

    pub fn with_variety(mut self, variety: impl Into<String>) -> Self {
        self.variety = Some(variety.into());
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Checks the invariants the timeline calculator relies on.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.end_date < self.start_date {
            return Err(CoreError::InvalidInterval {
                id: self.id.clone(),
            });
        }
        if self.progress > 100 {
            return Err(CoreError::ProgressOutOfRange {
                id: self.id.clone(),
                progress: u32::from(self.progress),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GrowRecord (wire shape)
// ---------------------------------------------------------------------------

/// A grow as delivered by the REST API or a JSON export: camelCase keys and
/// dates as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowRecord {
    pub id: String,
    pub species_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub farm_name: String,
    #[serde(default)]
    pub row_name: String,
    #[serde(default)]
    pub rack_name: String,
    #[serde(default)]
    pub shelf_name: String,
}

impl From<&TimelineItem> for GrowRecord {
    fn from(item: &TimelineItem) -> Self {
        Self {
            id: item.id.clone(),
            species_name: item.species_name.clone(),
            variety: item.variety.clone(),
            start_date: item.start_date.to_rfc3339(),
            end_date: item.end_date.to_rfc3339(),
            status: item.status.as_str().to_string(),
            progress: u32::from(item.progress),
            farm_name: item.location.farm_name.clone(),
            row_name: item.location.row_name.clone(),
            rack_name: item.location.rack_name.clone(),
            shelf_name: item.location.shelf_name.clone(),
        }
    }
}

impl TryFrom<GrowRecord> for TimelineItem {
    type Error = CoreError;

    fn try_from(record: GrowRecord) -> Result<Self, Self::Error> {
        let start_date = parse_date(&record.id, "startDate", &record.start_date)?;
        let end_date = parse_date(&record.id, "endDate", &record.end_date)?;
        let status: GrowStatus = record.status.parse()?;

        if record.progress > 100 {
            return Err(CoreError::ProgressOutOfRange {
                id: record.id,
                progress: record.progress,
            });
        }

        let item = TimelineItem {
            id: record.id,
            species_name: record.species_name,
            variety: record.variety.filter(|v| !v.trim().is_empty()),
            start_date,
            end_date,
            status,
            progress: record.progress as u8,
            location: Location {
                farm_name: record.farm_name,
                row_name: record.row_name,
                rack_name: record.rack_name,
                shelf_name: record.shelf_name,
            },
        };
        item.validate()?;
        Ok(item)
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(id: &str, field: &'static str, raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::InvalidDate {
            id: id.to_string(),
            field,
            value: raw.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_calendar_date() {
        let dt = parse_date("g1", "startDate", "2024-01-15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn parse_date_normalises_offsets_to_utc() {
        let dt = parse_date("g1", "startDate", "2024-01-15T02:00:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn parse_date_rejects_garbage() {
        let err = parse_date("g1", "endDate", "next tuesday").unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidDate {
                id: "g1".into(),
                field: "endDate",
                value: "next tuesday".into(),
            }
        );
    }

    #[test]
    fn location_path_skips_blank_levels() {
        let loc = Location::new("North Farm", "Row 2", "", "Shelf A");
        assert_eq!(loc.path(), "North Farm / Row 2 / Shelf A");
    }
}
