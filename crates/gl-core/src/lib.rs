//! Core of the growline dashboard: grow-cycle types, the immutable snapshot
//! handed around after each fetch, the Gantt timeline calculator, and the
//! grouping/filtering helpers the timeline views are built on.

pub mod config;
pub mod grouping;
pub mod snapshot;
pub mod source;
pub mod timeline;
pub mod types;

pub use grouping::{
    filter_by_search, filter_by_status, group_by_location, group_by_status, sort_items,
    status_counts, LocationGroups, SearchField, SortKey, SortOrder, StatusFilter, StatusGroups,
};
pub use snapshot::GrowSnapshot;
pub use source::{FileSource, HttpSource, ItemSource, SourceError, StaticSource};
pub use timeline::{
    compute_timeline_layout, layout_in_window, BarPosition, TickInterval, TickMark,
    TimelineLayout, TimelineOptions, TimelineWindow,
};
pub use types::{GrowRecord, GrowStatus, Location, TimelineItem};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Crate-level error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("grow {id}: {field} {value:?} is not a date (expected RFC 3339 or YYYY-MM-DD)")]
    InvalidDate {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("grow {id}: end date precedes start date")]
    InvalidInterval { id: String },

    #[error("grow {id}: progress {progress} is outside 0..=100")]
    ProgressOutOfRange { id: String, progress: u32 },

    #[error("duplicate grow id {0}")]
    DuplicateId(String),

    #[error("unknown grow status {0:?}")]
    UnknownStatus(String),

    #[error("unknown search field {0:?}")]
    UnknownField(String),
}
