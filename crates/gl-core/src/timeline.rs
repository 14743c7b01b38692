//! Gantt layout for the grow timeline.
//!
//! Everything here works in percentages of a shared time axis: the renderer
//! decides what 100% means in pixels or terminal columns. The calculator
//! trusts its input (dates were validated when the snapshot was built) and
//! never fails; an empty item list still yields a usable axis centred on the
//! reference date.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TimelineItem;

/// Smallest bar width, so zero-length grows stay visible.
pub const MIN_BAR_WIDTH_PERCENT: f64 = 1.0;

/// Largest `nominal_range_days` accepted from config or the command line
/// (about a century).
pub const MAX_RANGE_DAYS: u32 = 36_600;

/// Padding never exceeds this many days, whatever the options say.
const MAX_PADDING_DAYS: f64 = 3_660_000.0;

/// Upper bound on ticks per axis. Wider windows space ticks further apart.
pub const MAX_TICKS: usize = 1_000;

// ---------------------------------------------------------------------------
// TimelineOptions
// ---------------------------------------------------------------------------

/// Axis settings that come from configuration rather than from the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineOptions {
    /// The nominal range the view is designed around (e.g. a 90-day season).
    pub nominal_range_days: u32,
    /// Share of `nominal_range_days` added on each side of the raw bounds.
    pub padding_fraction: f64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            nominal_range_days: 90,
            padding_fraction: 0.1,
        }
    }
}

impl TimelineOptions {
    pub fn with_range_days(nominal_range_days: u32) -> Self {
        Self {
            nominal_range_days,
            ..Self::default()
        }
    }

    /// Padding as whole calendar days; the fractional part is dropped.
    pub fn padding(&self) -> Duration {
        let raw = f64::from(self.nominal_range_days) * self.padding_fraction;
        // Absorb float noise such as 70 * 0.1 = 7.000000000000001 / 6.9999...
        let days = (raw + 1e-9).floor();
        if days.is_finite() && days > 0.0 {
            Duration::days(days.min(MAX_PADDING_DAYS) as i64)
        } else {
            Duration::zero()
        }
    }
}

// ---------------------------------------------------------------------------
// TimelineWindow
// ---------------------------------------------------------------------------

/// The visible span of the axis. `end` is always after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimelineWindow {
    /// Build a window from explicit bounds. A zero or negative span is
    /// widened to one day past `start` (or before it, at the end of time).
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end > start {
            return Self { start, end };
        }
        match start.checked_add_signed(Duration::days(1)) {
            Some(end) => Self { start, end },
            None => Self {
                start: start - Duration::days(1),
                end: start,
            },
        }
    }

    /// Earliest start to latest end, padded outward. With no items the window
    /// is anchored on `reference_date`.
    pub fn from_items<'a, I>(items: I, reference_date: DateTime<Utc>, options: &TimelineOptions) -> Self
    where
        I: IntoIterator<Item = &'a TimelineItem>,
    {
        let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for item in items {
            bounds = Some(match bounds {
                None => (item.start_date, item.end_date),
                Some((lo, hi)) => (lo.min(item.start_date), hi.max(item.end_date)),
            });
        }
        let (raw_start, raw_end) = bounds.unwrap_or((reference_date, reference_date));
        let padding = options.padding();
        // Saturate at chrono's representable range instead of overflowing.
        let start = raw_start
            .checked_sub_signed(padding)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = raw_end
            .checked_add_signed(padding)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(start, end)
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    pub fn total_days(&self) -> i64 {
        self.span().num_days()
    }

    /// Position of `instant` on the axis, unclamped (may be < 0 or > 100).
    pub fn percent_of(&self, instant: DateTime<Utc>) -> f64 {
        self.fraction(instant - self.start) * 100.0
    }

    /// Length of `duration` as a percentage of the window.
    pub fn percent_of_duration(&self, duration: Duration) -> f64 {
        self.fraction(duration) * 100.0
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    fn fraction(&self, duration: Duration) -> f64 {
        let total = self.span().num_milliseconds() as f64;
        duration.num_milliseconds() as f64 / total
    }
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

/// Horizontal placement of one bar, in percent of the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarPosition {
    pub left: f64,
    pub width: f64,
}

impl BarPosition {
    /// Place an interval in `window`: `left` clamped into `[0, 100]`,
    /// `width` at least [`MIN_BAR_WIDTH_PERCENT`].
    pub fn for_interval(window: &TimelineWindow, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let left = window.percent_of(start).clamp(0.0, 100.0);
        let width = window
            .percent_of_duration(end - start)
            .max(MIN_BAR_WIDTH_PERCENT);
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// CSS-style `left` value, e.g. `"12.50%"`.
    pub fn left_css(&self) -> String {
        format!("{:.2}%", self.left)
    }

    /// CSS-style `width` value, e.g. `"48.61%"`.
    pub fn width_css(&self) -> String {
        format!("{:.2}%", self.width)
    }
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

/// Spacing between axis ticks, picked from the zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickInterval {
    Daily,
    EveryThreeDays,
    Weekly,
    BiWeekly,
}

impl TickInterval {
    /// zoom >= 4 daily, >= 2 every three days, >= 1 weekly, otherwise
    /// bi-weekly. Non-finite or non-positive zoom falls through to bi-weekly.
    pub fn from_zoom(zoom_level: f64) -> Self {
        if zoom_level >= 4.0 {
            TickInterval::Daily
        } else if zoom_level >= 2.0 {
            TickInterval::EveryThreeDays
        } else if zoom_level >= 1.0 {
            TickInterval::Weekly
        } else {
            TickInterval::BiWeekly
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            TickInterval::Daily => 1,
            TickInterval::EveryThreeDays => 3,
            TickInterval::Weekly => 7,
            TickInterval::BiWeekly => 14,
        }
    }

    /// Week-or-coarser labels carry the year.
    pub fn shows_year(&self) -> bool {
        self.days() >= 7
    }

    pub fn label(&self, date: DateTime<Utc>) -> String {
        if self.shows_year() {
            date.format("%b %-d, %Y").to_string()
        } else {
            date.format("%b %-d").to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickMark {
    pub date: DateTime<Utc>,
    /// Percent of the window.
    pub position: f64,
    pub label: String,
}

/// Ticks from the window start to its end (inclusive), `interval` apart.
///
/// At most [`MAX_TICKS`] are produced: when the window is too wide the step
/// grows to a multiple of the interval.
pub fn generate_ticks(window: &TimelineWindow, interval: TickInterval) -> Vec<TickMark> {
    let base = interval.days();
    let needed = window.total_days() / base + 1;
    let limit = MAX_TICKS as i64;
    let multiple = if needed > limit {
        (needed + limit - 2) / (limit - 1)
    } else {
        1
    };
    let step = Duration::days(base * multiple);

    let mut ticks = Vec::new();
    let mut current = window.start;
    while current <= window.end && ticks.len() < MAX_TICKS {
        ticks.push(TickMark {
            date: current,
            position: window.percent_of(current),
            label: interval.label(current),
        });
        match current.checked_add_signed(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    ticks
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub window: TimelineWindow,
    pub interval: TickInterval,
    /// Keyed by item id.
    pub positions: BTreeMap<String, BarPosition>,
    /// Reference-date marker, clamped into `[0, 100]`.
    pub current_time_percent: f64,
    pub ticks: Vec<TickMark>,
}

impl TimelineLayout {
    pub fn position(&self, id: &str) -> Option<&BarPosition> {
        self.positions.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lay out `items` on an axis derived from their own bounds, padded by 10% of
/// `nominal_range_days` on each side.
pub fn compute_timeline_layout<'a, I>(
    items: I,
    zoom_level: f64,
    reference_date: DateTime<Utc>,
    nominal_range_days: u32,
) -> TimelineLayout
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    compute_timeline_layout_with(
        items,
        zoom_level,
        reference_date,
        &TimelineOptions::with_range_days(nominal_range_days),
    )
}

/// [`compute_timeline_layout`] with explicit [`TimelineOptions`].
pub fn compute_timeline_layout_with<'a, I>(
    items: I,
    zoom_level: f64,
    reference_date: DateTime<Utc>,
    options: &TimelineOptions,
) -> TimelineLayout
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let items: Vec<&TimelineItem> = items.into_iter().collect();
    let window = TimelineWindow::from_items(items.iter().copied(), reference_date, options);
    layout_in_window(items, window, zoom_level, reference_date)
}

/// Lay out `items` on a caller-supplied window. Items outside the window are
/// clamped to its edges, never dropped.
pub fn layout_in_window<'a, I>(
    items: I,
    window: TimelineWindow,
    zoom_level: f64,
    reference_date: DateTime<Utc>,
) -> TimelineLayout
where
    I: IntoIterator<Item = &'a TimelineItem>,
{
    let positions: BTreeMap<String, BarPosition> = items
        .into_iter()
        .map(|item| {
            (
                item.id.clone(),
                BarPosition::for_interval(&window, item.start_date, item.end_date),
            )
        })
        .collect();

    let interval = TickInterval::from_zoom(zoom_level);
    let ticks = generate_ticks(&window, interval);
    let current_time_percent = window.percent_of(reference_date).clamp(0.0, 100.0);

    tracing::debug!(
        items = positions.len(),
        window_start = %window.start,
        window_end = %window.end,
        ?interval,
        ticks = ticks.len(),
        "computed timeline layout"
    );

    TimelineLayout {
        window,
        interval,
        positions,
        current_time_percent,
        ticks,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
