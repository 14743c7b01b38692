//! Where snapshots come from.
//!
//! The dashboard only ever sees [`ItemSource::fetch_snapshot`]; whether the
//! grows come from a fixture, a JSON export on disk or the farm REST API is
//! decided once at startup. Every source validates at the boundary, so a bad
//! date fails here and never reaches the timeline calculator.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{SourceConfig, SourceKind};
use crate::snapshot::GrowSnapshot;
use crate::types::{GrowRecord, TimelineItem};
use crate::CoreError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(String),

    /// Connection failure, DNS, TLS and the like.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timed out")]
    Timeout,

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid grow data: {0}")]
    Invalid(#[from] CoreError),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ItemSource trait
// ---------------------------------------------------------------------------

/// Supplies a fresh, validated snapshot on every call.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<GrowSnapshot, SourceError>;

    /// Short human-readable description used in logs.
    fn describe(&self) -> String;
}

/// Build the source selected in config.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn ItemSource>, SourceError> {
    match config.kind {
        SourceKind::File => Ok(Box::new(FileSource::new(&config.path))),
        SourceKind::Http => Ok(Box::new(
            HttpSource::new(&config.base_url)
                .with_timeout(Duration::from_secs(config.timeout_secs))?,
        )),
    }
}

fn parse_records(body: &str) -> Result<Vec<GrowRecord>, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Parse(e.to_string()))
}

// ---------------------------------------------------------------------------
// StaticSource
// ---------------------------------------------------------------------------

/// Serves the same records on every fetch. Used by tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<GrowRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<GrowRecord>) -> Self {
        Self { records }
    }

    pub fn from_items(items: &[TimelineItem]) -> Self {
        Self {
            records: items.iter().map(GrowRecord::from).collect(),
        }
    }
}

#[async_trait]
impl ItemSource for StaticSource {
    async fn fetch_snapshot(&self) -> Result<GrowSnapshot, SourceError> {
        Ok(GrowSnapshot::from_records(self.records.clone())?)
    }

    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }
}

// ---------------------------------------------------------------------------
// FileSource
// ---------------------------------------------------------------------------

/// Reads a JSON array of grow records from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ItemSource for FileSource {
    async fn fetch_snapshot(&self) -> Result<GrowSnapshot, SourceError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {e}", self.path.display())))?;
        let records = parse_records(&body)?;
        let snapshot = GrowSnapshot::from_records(records)?;
        tracing::info!(path = %self.path.display(), items = snapshot.len(), "loaded grow snapshot");
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

// ---------------------------------------------------------------------------
// HttpSource
// ---------------------------------------------------------------------------

/// `GET {base_url}/api/grows`, optionally narrowed to one farm. One request
/// per fetch: no retries, no paging.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
    farm: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            farm: None,
        }
    }

    /// Replace the client with one that gives up after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, SourceError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn with_farm(mut self, farm: impl Into<String>) -> Self {
        self.farm = Some(farm.into());
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/grows", self.base_url)
    }
}

#[async_trait]
impl ItemSource for HttpSource {
    async fn fetch_snapshot(&self) -> Result<GrowSnapshot, SourceError> {
        let url = self.endpoint();
        let mut request = self.client.get(&url);
        if let Some(farm) = &self.farm {
            request = request.query(&[("farm", farm.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "grow fetch failed");
            return Err(SourceError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let records = parse_records(&body)?;
        let snapshot = GrowSnapshot::from_records(records)?;
        tracing::info!(%url, items = snapshot.len(), "fetched grow snapshot");
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        match &self.farm {
            Some(farm) => format!("http {} (farm {farm})", self.endpoint()),
            None => format!("http {}", self.endpoint()),
        }
    }
}
