use std::fmt::Write as _;

use gl_core::{status_counts, GrowSnapshot};

/// Run the `status` subcommand: grow counts per status.
pub fn run(snapshot: &GrowSnapshot, source: &str) -> anyhow::Result<String> {
    let counts = status_counts(snapshot.items());

    let mut out = String::new();
    writeln!(out, "growline status  (v{})", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(out, "Source:         {source}")?;
    writeln!(
        out,
        "Fetched:        {}",
        snapshot.taken_at().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out, "Total grows:    {}", snapshot.len())?;
    for (status, count) in counts {
        let label = format!("{status}:");
        writeln!(out, "  {} {:<13}{}", status.glyph(), label, count)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use axum::{routing::get, Json, Router};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::commands::{build_source, fetch, SourceOverrides};
    use gl_core::config::Config;
    use gl_core::{GrowStatus, TimelineItem};

    #[test]
    fn every_status_is_listed() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        let snapshot = GrowSnapshot::new(vec![
            TimelineItem::new("a", "Kale", start, end, GrowStatus::Active),
            TimelineItem::new("b", "Chard", start, end, GrowStatus::Active),
            TimelineItem::new("c", "Mint", start, end, GrowStatus::Aborted),
        ])
        .unwrap();

        let out = run(&snapshot, "file grows.json").unwrap();
        assert!(out.contains("Source:         file grows.json"));
        assert!(out.contains("Total grows:    3"));
        assert!(out.contains("o planned:     0"));
        assert!(out.contains("@ active:      2"));
        assert!(out.contains("+ completed:   0"));
        assert!(out.contains("x aborted:     1"));
    }

    #[test]
    fn empty_snapshot_counts_zero() {
        let out = run(&GrowSnapshot::empty(), "static (0 records)").unwrap();
        assert!(out.contains("Total grows:    0"));
        assert!(out.contains("@ active:      0"));
    }

    #[tokio::test]
    async fn status_against_http_api() {
        let app = Router::new().route(
            "/api/grows",
            get(|| async {
                Json(json!([
                    {"id": "g1", "speciesName": "Kale", "startDate": "2024-01-01",
                     "endDate": "2024-02-01", "status": "active", "farmName": "North"},
                    {"id": "g2", "speciesName": "Mint", "startDate": "2024-01-05",
                     "endDate": "2024-02-10", "status": "planned", "farmName": "South"}
                ]))
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // The fixture ignores ?farm=, so the filter has to happen client side.
        let overrides = SourceOverrides {
            api_url: Some(format!("http://{addr}")),
            farm: Some("North".into()),
            ..Default::default()
        };
        let source = build_source(&Config::default(), &overrides).unwrap();
        let snapshot = fetch(source.as_ref(), overrides.farm.as_deref()).await.unwrap();

        let out = run(&snapshot, &source.describe()).unwrap();
        assert!(out.contains("Total grows:    1"));
        assert!(out.contains("@ active:      1"));
        assert!(out.contains("(farm North)"));
    }

    #[tokio::test]
    async fn unreachable_api_is_a_friendly_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let overrides = SourceOverrides {
            api_url: Some(format!("http://{addr}")),
            ..Default::default()
        };
        let source = build_source(&Config::default(), &overrides).unwrap();
        let err = fetch(source.as_ref(), None).await.unwrap_err();
        assert!(err.to_string().contains("Could not reach the grow API"));
    }
}
