//! Pure helpers behind the status lanes, the farm/row/rack tree and the
//! search box. Every function borrows from the snapshot and keeps input
//! order unless it is explicitly a sort.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{GrowStatus, TimelineItem};
use crate::CoreError;

pub type StatusGroups<'a> = BTreeMap<GrowStatus, Vec<&'a TimelineItem>>;

/// farm → row → rack → items.
pub type LocationGroups<'a> =
    BTreeMap<&'a str, BTreeMap<&'a str, BTreeMap<&'a str, Vec<&'a TimelineItem>>>>;

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Partition by status. Only statuses that occur get a group; callers that
/// want empty lanes add them themselves.
pub fn group_by_status<'a, I>(items: I) -> StatusGroups<'a>
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let mut groups = StatusGroups::new();
    for item in items {
        groups.entry(item.status).or_default().push(item);
    }
    groups
}

/// Three-level grouping on the raw location labels (no trimming, no case
/// folding: `"Row 1"` and `"row 1"` are different rows).
pub fn group_by_location<'a, I>(items: I) -> LocationGroups<'a>
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let mut groups = LocationGroups::new();
    for item in items {
        let loc = &item.location;
        groups
            .entry(loc.farm_name.as_str())
            .or_default()
            .entry(loc.row_name.as_str())
            .or_default()
            .entry(loc.rack_name.as_str())
            .or_default()
            .push(item);
    }
    groups
}

/// Number of items per status, with every status present.
pub fn status_counts<'a, I>(items: I) -> BTreeMap<GrowStatus, usize>
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let mut counts: BTreeMap<GrowStatus, usize> =
        GrowStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for item in items {
        *counts.entry(item.status).or_insert(0) += 1;
    }
    counts
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Text fields the search box can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Id,
    SpeciesName,
    Variety,
    FarmName,
    RowName,
    RackName,
    ShelfName,
}

impl SearchField {
    /// What the dashboard searches when the caller does not say.
    pub const DEFAULT: [SearchField; 6] = [
        SearchField::SpeciesName,
        SearchField::Variety,
        SearchField::FarmName,
        SearchField::RowName,
        SearchField::RackName,
        SearchField::ShelfName,
    ];

    pub fn value<'a>(&self, item: &'a TimelineItem) -> Option<&'a str> {
        match self {
            SearchField::Id => Some(item.id.as_str()),
            SearchField::SpeciesName => Some(item.species_name.as_str()),
            SearchField::Variety => item.variety.as_deref(),
            SearchField::FarmName => Some(item.location.farm_name.as_str()),
            SearchField::RowName => Some(item.location.row_name.as_str()),
            SearchField::RackName => Some(item.location.rack_name.as_str()),
            SearchField::ShelfName => Some(item.location.shelf_name.as_str()),
        }
    }
}

impl FromStr for SearchField {
    type Err = CoreError;

    /// Accepts `species_name`, `speciesName`, `species-name` and the short
    /// forms `species`, `farm`, `row`, `rack`, `shelf`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "id" => Ok(SearchField::Id),
            "species" | "speciesname" => Ok(SearchField::SpeciesName),
            "variety" => Ok(SearchField::Variety),
            "farm" | "farmname" => Ok(SearchField::FarmName),
            "row" | "rowname" => Ok(SearchField::RowName),
            "rack" | "rackname" => Ok(SearchField::RackName),
            "shelf" | "shelfname" => Ok(SearchField::ShelfName),
            _ => Err(CoreError::UnknownField(s.to_string())),
        }
    }
}

/// Case-insensitive substring match of `term` against any of `fields`.
///
/// A blank term is a passthrough: every item comes back, in order. Leading
/// and trailing whitespace in a non-blank term is ignored.
pub fn filter_by_search<'a, I>(items: I, term: &str, fields: &[SearchField]) -> Vec<&'a TimelineItem>
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.into_iter().collect();
    }
    items
        .into_iter()
        .filter(|item| {
            fields.iter().any(|field| {
                field
                    .value(item)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Status filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(GrowStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: GrowStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl From<GrowStatus> for StatusFilter {
    fn from(status: GrowStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl From<Option<GrowStatus>> for StatusFilter {
    fn from(status: Option<GrowStatus>) -> Self {
        status.map_or(StatusFilter::All, StatusFilter::Only)
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            trimmed.parse().map(StatusFilter::Only)
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

pub fn filter_by_status<'a, I>(items: I, status: impl Into<StatusFilter>) -> Vec<&'a TimelineItem>
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let filter = status.into();
    items
        .into_iter()
        .filter(|item| filter.matches(item.status))
        .collect()
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    StartDate,
    EndDate,
    Progress,
    SpeciesName,
    Status,
}

impl SortKey {
    fn compare(&self, a: &TimelineItem, b: &TimelineItem) -> Ordering {
        match self {
            SortKey::StartDate => a.start_date.cmp(&b.start_date),
            SortKey::EndDate => a.end_date.cmp(&b.end_date),
            SortKey::Progress => a.progress.cmp(&b.progress),
            SortKey::SpeciesName => a
                .species_name
                .to_lowercase()
                .cmp(&b.species_name.to_lowercase()),
            SortKey::Status => a.status.cmp(&b.status),
        }
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "start" | "start_date" => Ok(SortKey::StartDate),
            "end" | "end_date" => Ok(SortKey::EndDate),
            "progress" => Ok(SortKey::Progress),
            "species" | "species_name" | "name" => Ok(SortKey::SpeciesName),
            "status" => Ok(SortKey::Status),
            _ => Err(CoreError::UnknownField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort: items that compare equal keep their input order in both
/// directions.
pub fn sort_items<'a, I>(items: I, key: SortKey, order: SortOrder) -> Vec<&'a TimelineItem>
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let mut sorted: Vec<&TimelineItem> = items.into_iter().collect();
    match order {
        SortOrder::Ascending => sorted.sort_by(|a, b| key.compare(a, b)),
        SortOrder::Descending => sorted.sort_by(|a, b| key.compare(b, a)),
    }
    sorted
}
