use std::fmt::Write as _;

use gl_core::{group_by_location, group_by_status, GrowSnapshot, TimelineItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GroupBy {
    /// One lane per status.
    Status,
    /// Farm, then row, then rack.
    Location,
}

/// Run the `groups` subcommand.
pub fn run(snapshot: &GrowSnapshot, by: GroupBy, json: bool) -> anyhow::Result<String> {
    let mut out = String::new();
    match by {
        GroupBy::Status => {
            let groups = group_by_status(snapshot.items());
            if json {
                return Ok(serde_json::to_string_pretty(&groups)? + "\n");
            }
            for (status, items) in &groups {
                writeln!(out, "{} {} ({})", status.glyph(), status, items.len())?;
                for item in items {
                    writeln!(out, "    {}", describe(item))?;
                }
            }
        }
        GroupBy::Location => {
            let groups = group_by_location(snapshot.items());
            if json {
                return Ok(serde_json::to_string_pretty(&groups)? + "\n");
            }
            for (farm, rows) in &groups {
                writeln!(out, "{}", label(farm))?;
                for (row, racks) in rows {
                    writeln!(out, "  {}", label(row))?;
                    for (rack, items) in racks {
                        writeln!(out, "    {} ({})", label(rack), items.len())?;
                        for item in items {
                            writeln!(out, "      {} {}", item.status.glyph(), describe(item))?;
                        }
                    }
                }
            }
        }
    }

    if out.is_empty() {
        out.push_str("(no grows)\n");
    }
    Ok(out)
}

fn label(name: &str) -> &str {
    if name.trim().is_empty() {
        "(unassigned)"
    } else {
        name
    }
}

fn describe(item: &TimelineItem) -> String {
    let name = match &item.variety {
        Some(variety) => format!("{} '{}'", item.species_name, variety),
        None => item.species_name.clone(),
    };
    format!(
        "{} [{}] {} .. {}  {}%",
        name,
        item.id,
        item.start_date.format("%Y-%m-%d"),
        item.end_date.format("%Y-%m-%d"),
        item.progress
    )
}
