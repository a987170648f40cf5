use crate::{PointRow, SeriesId, Store, StoreError, Table};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// In-process [`Store`] used to measure the pipeline without a cluster.
///
/// Points are counted per (series, day) partition. A store built with
/// [`MemoryStore::retaining`] also keeps every written row, which is handy in
/// tests but grows without bound.
#[derive(Debug, Default)]
pub struct MemoryStore {
    series: Mutex<Registry>,
    partitions: Mutex<HashMap<(SeriesId, DateTime<Utc>), u64>>,
    rows: Option<Mutex<Vec<PointRow>>>,
}

/// Registered series in registration order.
#[derive(Debug, Default)]
struct Registry {
    order: Vec<SeriesId>,
    known: HashSet<SeriesId>,
}

impl Registry {
    fn insert(&mut self, id: SeriesId) {
        if self.known.insert(id) {
            self.order.push(id);
        }
    }

    fn clear(&mut self) {
        self.order.clear();
        self.known.clear();
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retaining() -> Self {
        Self {
            rows: Some(Mutex::new(Vec::new())),
            ..Self::default()
        }
    }

    pub fn series(&self) -> Vec<SeriesId> {
        self.series.lock().order.clone()
    }

    /// Every row written so far, in arrival order. Empty unless retaining.
    pub fn rows(&self) -> Vec<PointRow> {
        self.rows
            .as_ref()
            .map(|rows| rows.lock().clone())
            .unwrap_or_default()
    }

    pub fn point_count(&self) -> u64 {
        self.partitions.lock().values().sum()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn truncate(&self, table: Table) -> Result<(), StoreError> {
        match table {
            Table::Series => self.series.lock().clear(),
            Table::Points => {
                self.partitions.lock().clear();
                if let Some(rows) = &self.rows {
                    rows.lock().clear();
                }
            }
        }
        Ok(())
    }

    async fn register_series(&self, id: SeriesId) -> Result<(), StoreError> {
        self.series.lock().insert(id);
        Ok(())
    }

    async fn write_point(&self, row: &PointRow) -> Result<(), StoreError> {
        *self
            .partitions
            .lock()
            .entry((row.series_id, row.day))
            .or_default() += 1;
        if let Some(rows) = &self.rows {
            rows.lock().push(*row);
        }
        Ok(())
    }

    async fn list_series(&self) -> Result<Vec<SeriesId>, StoreError> {
        Ok(self.series())
    }

    async fn read_day(&self, id: SeriesId, day: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(self
            .partitions
            .lock()
            .get(&(id, day))
            .copied()
            .unwrap_or_default())
    }
}
