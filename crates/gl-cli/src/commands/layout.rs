use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use gl_core::timeline::compute_timeline_layout_with;
use gl_core::{
    filter_by_status, sort_items, GrowSnapshot, SortKey, SortOrder, StatusFilter,
    TimelineLayout, TimelineOptions,
};

/// Columns used for the text Gantt chart.
const CHART_WIDTH: usize = 60;

pub struct LayoutArgs {
    pub zoom: f64,
    pub reference: DateTime<Utc>,
    pub options: TimelineOptions,
    pub status: StatusFilter,
    pub json: bool,
}

/// `--zoom` value parser: a finite number above zero, same rule as
/// `timeline.default_zoom` in config.
pub fn parse_zoom(raw: &str) -> Result<f64, String> {
    let zoom: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{raw:?} is not a number"))?;
    if zoom.is_finite() && zoom > 0.0 {
        Ok(zoom)
    } else {
        Err(format!("zoom must be positive, got {raw}"))
    }
}

/// Run the `layout` subcommand: position every matching grow on the timeline.
pub fn run(snapshot: &GrowSnapshot, args: &LayoutArgs) -> anyhow::Result<String> {
    let items = filter_by_status(snapshot.items(), args.status);
    let layout =
        compute_timeline_layout_with(items.iter().copied(), args.zoom, args.reference, &args.options);

    if args.json {
        return Ok(serde_json::to_string_pretty(&layout)? + "\n");
    }

    let mut out = String::new();
    writeln!(
        out,
        "Timeline {} .. {}  ({} days, {} ticks)",
        layout.window.start.format("%Y-%m-%d"),
        layout.window.end.format("%Y-%m-%d"),
        layout.window.total_days(),
        tick_name(&layout),
    )?;
    writeln!(
        out,
        "Now:      {}  at {:.2}%",
        args.reference.format("%Y-%m-%d"),
        layout.current_time_percent
    )?;
    writeln!(out, "{}", "-".repeat(CHART_WIDTH + 30))?;

    if layout.is_empty() {
        writeln!(out, "(no grows match status {})", args.status)?;
        return Ok(out);
    }

    let now_col = column(layout.current_time_percent).min(CHART_WIDTH - 1);
    for item in sort_items(items, SortKey::StartDate, SortOrder::Ascending) {
        let Some(bar) = layout.position(&item.id) else {
            continue;
        };
        let mut row: Vec<char> = vec![' '; CHART_WIDTH];
        row[now_col] = '|';
        let start = column(bar.left).min(CHART_WIDTH - 1);
        let len = column(bar.width).max(1);
        for cell in row.iter_mut().skip(start).take(len) {
            *cell = '#';
        }
        writeln!(
            out,
            "{} {:<24} [{}] {:>7} +{:>7}",
            item.status.glyph(),
            truncate(&item.species_name, 24),
            row.into_iter().collect::<String>(),
            bar.left_css(),
            bar.width_css(),
        )?;
    }

    writeln!(out, "{}", "-".repeat(CHART_WIDTH + 30))?;
    let ticks: Vec<String> = layout
        .ticks
        .iter()
        .map(|t| format!("{} ({:.1}%)", t.label, t.position))
        .collect();
    writeln!(out, "Ticks: {}", ticks.join(", "))?;
    Ok(out)
}

fn tick_name(layout: &TimelineLayout) -> &'static str {
    match layout.interval.days() {
        1 => "daily",
        3 => "3-day",
        7 => "weekly",
        _ => "bi-weekly",
    }
}

fn column(percent: f64) -> usize {
    ((percent / 100.0) * CHART_WIDTH as f64).round().max(0.0) as usize
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max - 1).collect();
        cut.push('~');
        cut
    }
}
