use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::types::{GrowRecord, GrowStatus, TimelineItem};
use crate::CoreError;

/// One fetch result, validated once and never mutated afterwards.
///
/// Refreshing the dashboard means building a new snapshot; there is no
/// partial update or merge. Cloning is cheap since the items live behind an
/// `Arc`.
#[derive(Debug, Clone)]
pub struct GrowSnapshot {
    items: Arc<[TimelineItem]>,
    taken_at: DateTime<Utc>,
}

impl GrowSnapshot {
    /// Validate `items` and freeze them into a snapshot stamped with the
    /// current time.
    pub fn new(items: Vec<TimelineItem>) -> Result<Self, CoreError> {
        Self::with_timestamp(items, Utc::now())
    }

    /// Like [`GrowSnapshot::new`] with an explicit timestamp.
    pub fn with_timestamp(items: Vec<TimelineItem>, taken_at: DateTime<Utc>) -> Result<Self, CoreError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if !seen.insert(item.id.as_str()) {
                return Err(CoreError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self {
            items: items.into(),
            taken_at,
        })
    }

    /// Convert wire records, failing on the first invalid one.
    pub fn from_records(records: Vec<GrowRecord>) -> Result<Self, CoreError> {
        let items = records
            .into_iter()
            .map(TimelineItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(items)
    }

    pub fn empty() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            taken_at: Utc::now(),
        }
    }

    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TimelineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn count_with_status(&self, status: GrowStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn to_records(&self) -> Vec<GrowRecord> {
        self.items.iter().map(GrowRecord::from).collect()
    }
}

impl Default for GrowSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
