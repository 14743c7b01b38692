pub mod config;
pub mod groups;
pub mod layout;
pub mod search;
pub mod status;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gl_core::config::{Config, SourceKind};
use gl_core::source::{self, FileSource, HttpSource, ItemSource, SourceError};
use gl_core::types::parse_date;
use gl_core::GrowSnapshot;

/// Source selection from the command line. Takes precedence over config.
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub file: Option<PathBuf>,
    pub api_url: Option<String>,
    pub farm: Option<String>,
}

/// Pick the item source: `--file`, then `--api-url`, then the config file.
pub fn build_source(
    config: &Config,
    overrides: &SourceOverrides,
) -> anyhow::Result<Box<dyn ItemSource>> {
    let timeout = Duration::from_secs(config.source.timeout_secs);

    if let Some(path) = &overrides.file {
        return Ok(Box::new(FileSource::new(path)));
    }
    if let Some(url) = &overrides.api_url {
        return Ok(Box::new(with_farm(
            HttpSource::new(url).with_timeout(timeout)?,
            overrides.farm.as_deref(),
        )));
    }

    match config.source.kind {
        SourceKind::Http => Ok(Box::new(with_farm(
            HttpSource::new(&config.source.base_url).with_timeout(timeout)?,
            overrides.farm.as_deref(),
        ))),
        SourceKind::File => Ok(source::from_config(&config.source)?),
    }
}

fn with_farm(source: HttpSource, farm: Option<&str>) -> HttpSource {
    match farm {
        Some(farm) => source.with_farm(farm),
        None => source,
    }
}

/// Fetch one snapshot. The farm filter is applied here as well, so file
/// sources and servers that ignore `?farm=` behave the same.
pub async fn fetch(source: &dyn ItemSource, farm: Option<&str>) -> anyhow::Result<GrowSnapshot> {
    let snapshot = source.fetch_snapshot().await.map_err(friendly_error)?;
    tracing::info!(
        source = %source.describe(),
        items = snapshot.len(),
        "fetched grows"
    );

    let Some(farm) = farm else {
        return Ok(snapshot);
    };
    let kept = snapshot
        .items()
        .iter()
        .filter(|item| item.location.farm_name == farm)
        .cloned()
        .collect();
    Ok(GrowSnapshot::with_timestamp(kept, snapshot.taken_at())?)
}

/// `--date` parsed as the reference instant; now when absent.
pub fn reference_date(raw: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match raw {
        Some(raw) => Ok(parse_date("--date", "reference date", raw)?),
        None => Ok(Utc::now()),
    }
}

/// Map source errors to user-facing messages.
pub fn friendly_error(err: SourceError) -> anyhow::Error {
    match err {
        SourceError::Http(detail) => anyhow::anyhow!(
            "Could not reach the grow API: {detail}\n  \
             (hint: check --api-url or source.base_url)"
        ),
        SourceError::Timeout => {
            anyhow::anyhow!("Request timed out. Raise source.timeout_secs or try again.")
        }
        SourceError::Io(detail) => anyhow::anyhow!(
            "Could not read grows: {detail}\n  \
             (hint: check --file or source.path)"
        ),
        other => anyhow::Error::new(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gl_core::source::StaticSource;
    use gl_core::types::{GrowStatus, Location, TimelineItem};

    fn item(id: &str, farm: &str) -> TimelineItem {
        TimelineItem::new(
            id,
            "Kale",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            GrowStatus::Active,
        )
        .with_location(Location::new(farm, "Row 1", "Rack A", "Shelf 1"))
    }

    #[tokio::test]
    async fn fetch_filters_by_farm() {
        let src = StaticSource::from_items(&[item("a", "North"), item("b", "South")]);

        let all = fetch(&src, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let south = fetch(&src, Some("South")).await.unwrap();
        assert_eq!(south.len(), 1);
        assert_eq!(south.items()[0].id, "b");
    }

    #[test]
    fn overrides_take_precedence_over_config() {
        let config = Config::default();

        let file = SourceOverrides {
            file: Some("/tmp/other.json".into()),
            ..Default::default()
        };
        assert_eq!(
            build_source(&config, &file).unwrap().describe(),
            "file /tmp/other.json"
        );

        let http = SourceOverrides {
            api_url: Some("http://127.0.0.1:9/".into()),
            farm: Some("North".into()),
            ..Default::default()
        };
        let described = build_source(&config, &http).unwrap().describe();
        assert!(described.starts_with("http http://127.0.0.1:9/api/grows"));
        assert!(described.contains("North"));

        let from_config = build_source(&config, &SourceOverrides::default()).unwrap();
        assert_eq!(from_config.describe(), "file grows.json");
    }

    #[test]
    fn reference_date_parses_plain_dates() {
        let parsed = reference_date(Some("2024-02-01")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert!(reference_date(Some("soon")).is_err());
        assert!(reference_date(None).is_ok());
    }
}
